//! Handlers for the per-kind selection of tracked metrics.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stride_core::entries::EntryKind;
use stride_core::error::CoreError;
use stride_core::migration::DocType;
use stride_core::metrics::UserMetricConfig;
use stride_core::profile::Profile;
use stride_core::store::{DocumentKey, PROFILE_DOC_ID};
use stride_core::types::UserId;

use crate::error::{AppError, AppResult};
use crate::handlers::{metric_config_doc_id, parse_kind};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for replacing a metric selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetricConfig {
    pub selected_metric_ids: Vec<String>,
}

/// GET /users/{user_id}/metric-config/{kind}
pub async fn get_metric_config(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(UserId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let doc_id = metric_config_doc_id(kind);

    let config: UserMetricConfig = state
        .documents()
        .load(DocType::UserMetricConfig, &DocumentKey::new(user_id, doc_id))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "UserMetricConfig",
                id: format!("{user_id}/{doc_id}"),
            })
        })?;

    Ok(Json(DataResponse { data: config }))
}

/// PUT /users/{user_id}/metric-config/{kind}
///
/// Replaces the selection and marks the matching setup step complete on the
/// profile, if one exists.
pub async fn put_metric_config(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(UserId, String)>,
    Json(body): Json<UpdateMetricConfig>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let config = UserMetricConfig::new(body.selected_metric_ids);
    if config.selected_metric_ids.is_empty() {
        return Err(AppError::BadRequest(
            "selectedMetricIds must contain at least one metric".to_string(),
        ));
    }

    let docs = state.documents();
    docs.save(
        DocType::UserMetricConfig,
        &DocumentKey::new(user_id, metric_config_doc_id(kind)),
        &config,
    )
    .await?;

    let profile_key = DocumentKey::new(user_id, PROFILE_DOC_ID);
    if let Some(mut profile) = docs.load::<Profile>(DocType::Profile, &profile_key).await? {
        let flag = match kind {
            EntryKind::Body => &mut profile.daily_setup_complete,
            EntryKind::Outcome => &mut profile.outcomes_setup_complete,
        };
        if !*flag {
            *flag = true;
            docs.save(DocType::Profile, &profile_key, &profile).await?;
        }
    }

    tracing::info!(
        user_id,
        kind = kind.as_str(),
        tracked = config.tracked_metric_count(),
        "Metric selection saved"
    );

    Ok(Json(DataResponse { data: config }))
}
