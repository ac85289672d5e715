//! Handlers for the athlete profile document.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use stride_core::error::CoreError;
use stride_core::migration::DocType;
use stride_core::profile::Profile;
use stride_core::store::{DocumentKey, PROFILE_DOC_ID};
use stride_core::types::UserId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /users/{user_id}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let profile: Profile = state
        .documents()
        .load(DocType::Profile, &DocumentKey::new(user_id, PROFILE_DOC_ID))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                id: user_id.to_string(),
            })
        })?;

    Ok(Json(DataResponse { data: profile }))
}

/// PUT /users/{user_id}/profile
///
/// Replaces the whole profile.
pub async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(profile): Json<Profile>,
) -> AppResult<impl IntoResponse> {
    profile.validate()?;

    state
        .documents()
        .save(
            DocType::Profile,
            &DocumentKey::new(user_id, PROFILE_DOC_ID),
            &profile,
        )
        .await?;

    tracing::info!(user_id, sport = profile.sport.as_str(), "Profile saved");

    Ok(Json(DataResponse { data: profile }))
}
