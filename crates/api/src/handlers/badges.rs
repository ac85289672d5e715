//! Handlers for earned badges and badge checks.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stride_core::badges::BadgeDefinition;
use stride_core::entries::EntryKind;
use stride_core::migration::DocType;
use stride_core::metrics::UserMetricConfig;
use stride_core::profile::Profile;
use stride_core::store::{AwardStore, DocumentKey, DAILY_METRICS_DOC_ID, PROFILE_DOC_ID};
use stride_core::types::{Timestamp, UserId};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for a badge check.
#[derive(Debug, Deserialize)]
pub struct CheckBadgesParams {
    /// Overrides the size of the user's daily metric selection.
    pub tracked_metric_count: Option<usize>,
}

/// An earned badge joined with its catalog definition. `badge` is absent
/// when the badge has since been removed from the catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgeResponse {
    pub badge_id: String,
    pub earned_at: Timestamp,
    pub badge: Option<BadgeDefinition>,
}

/// A badge awarded by a check, with its notification text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
    #[serde(flatten)]
    pub badge: BadgeDefinition,
    /// Rendered message; absent when the user has no profile.
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /users/{user_id}/badges
pub async fn list_earned(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let earned: Vec<EarnedBadgeResponse> = state
        .store()
        .list_awards(user_id)
        .await?
        .into_iter()
        .map(|award| EarnedBadgeResponse {
            badge: state.catalog.get(&award.badge_id).cloned(),
            badge_id: award.badge_id,
            earned_at: award.earned_at,
        })
        .collect();

    Ok(Json(DataResponse { data: earned }))
}

/// POST /users/{user_id}/badges/check
///
/// Evaluates the user's last `BADGE_HISTORY_DAYS` body entries, however long
/// ago they were logged, and awards every newly earned badge. Returns only
/// the badges awarded by this call.
pub async fn check_badges(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<CheckBadgesParams>,
) -> AppResult<impl IntoResponse> {
    let docs = state.documents();
    let history_len = state.config.badge_history_days.get() as usize;

    let entries = docs
        .recent_entries(user_id, EntryKind::Body, history_len)
        .await?;

    let tracked_metric_count = match params.tracked_metric_count {
        Some(count) => count,
        None => docs
            .load::<UserMetricConfig>(
                DocType::UserMetricConfig,
                &DocumentKey::new(user_id, DAILY_METRICS_DOC_ID),
            )
            .await?
            .map(|config| config.tracked_metric_count())
            .unwrap_or(0),
    };

    let profile: Option<Profile> = docs
        .load(DocType::Profile, &DocumentKey::new(user_id, PROFILE_DOC_ID))
        .await?;
    let scaling_factor = profile.as_ref().and_then(Profile::scaling_factor);

    let awarded = state
        .awarder()
        .check_and_award(user_id, &entries, tracked_metric_count, scaling_factor)
        .await?;

    tracing::debug!(
        user_id,
        entries = entries.len(),
        tracked_metric_count,
        awarded = awarded.len(),
        "Badge check complete"
    );

    let data: Vec<AwardedBadge> = awarded
        .into_iter()
        .map(|badge| AwardedBadge {
            message: profile.as_ref().map(|p| badge.render_message(&p.username)),
            badge,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}
