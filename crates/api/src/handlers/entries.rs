//! Handlers for daily body and outcome entries.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stride_core::entries::{compute_totals, metric_average};
use stride_core::error::CoreError;
use stride_core::metrics::{default_metrics, metric_by_id};
use stride_core::streaks::parse_date;
use stride_core::types::UserId;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_kind;
use crate::response::DataResponse;
use crate::state::AppState;

/// Entries returned when `limit` is omitted.
pub const DEFAULT_ENTRY_LIMIT: usize = 30;
/// Upper bound on `limit`.
pub const MAX_ENTRY_LIMIT: usize = 366;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EntryListParams {
    pub limit: Option<usize>,
}

impl EntryListParams {
    fn resolve(&self) -> AppResult<usize> {
        match self.limit {
            None => Ok(DEFAULT_ENTRY_LIMIT),
            Some(0) => Err(AppError::BadRequest("limit must be at least 1".to_string())),
            Some(n) => Ok(n.min(MAX_ENTRY_LIMIT)),
        }
    }
}

/// Body for logging a metric value.
#[derive(Debug, Deserialize)]
pub struct UpsertMetricBody {
    pub value: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Aggregates over the most recent entries for one metric.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    pub metric_id: String,
    pub entry_count: usize,
    pub total: f64,
    pub average: Option<f64>,
    /// Threshold of the first badge targeting this metric.
    pub goal: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /users/{user_id}/entries/{kind}?limit=N
///
/// Most recent entries, newest first.
pub async fn list_entries(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(UserId, String)>,
    Query(params): Query<EntryListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let limit = params.resolve()?;

    let entries = state
        .documents()
        .recent_entries(user_id, kind, limit)
        .await?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /users/{user_id}/entries/{kind}/{date}
pub async fn get_entry(
    State(state): State<AppState>,
    Path((user_id, kind, date)): Path<(UserId, String, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let date = parse_date(&date)?;

    let entry = state
        .documents()
        .entry(user_id, kind, date)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Entry",
                id: format!("{}/{date}", kind.as_str()),
            })
        })?;

    Ok(Json(DataResponse { data: entry }))
}

/// PUT /users/{user_id}/entries/{kind}/{date}/metrics/{metric_id}
///
/// Logs one value, replacing any earlier value for that metric and day.
/// Built-in metrics are checked against their bounds; custom metric ids are
/// accepted as-is.
pub async fn put_metric(
    State(state): State<AppState>,
    Path((user_id, kind, date, metric_id)): Path<(UserId, String, String, String)>,
    Json(body): Json<UpsertMetricBody>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let date = parse_date(&date)?;

    if let Some(definition) = metric_by_id(&default_metrics(), &metric_id) {
        definition.check_value(body.value)?;
    }

    let entry = state
        .documents()
        .upsert_metric(user_id, kind, date, &metric_id, body.value, body.tags)
        .await?;

    tracing::debug!(user_id, kind = kind.as_str(), %date, metric_id = %metric_id, "Metric logged");

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /users/{user_id}/entries/{kind}/{date}/metrics/{metric_id}
///
/// The entry itself is kept even when its last metric is removed.
pub async fn delete_metric(
    State(state): State<AppState>,
    Path((user_id, kind, date, metric_id)): Path<(UserId, String, String, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let date = parse_date(&date)?;

    let entry = state
        .documents()
        .delete_metric(user_id, kind, date, &metric_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Entry",
                id: format!("{}/{date}", kind.as_str()),
            })
        })?;

    Ok(Json(DataResponse { data: entry }))
}

/// GET /users/{user_id}/entries/{kind}/totals/{metric_id}?limit=N
pub async fn get_totals(
    State(state): State<AppState>,
    Path((user_id, kind, metric_id)): Path<(UserId, String, String)>,
    Query(params): Query<EntryListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let limit = params.resolve()?;

    let entries = state
        .documents()
        .recent_entries(user_id, kind, limit)
        .await?;

    let totals = MetricTotals {
        entry_count: entries.len(),
        total: compute_totals(&entries, &metric_id),
        average: metric_average(&entries, &metric_id),
        goal: state.catalog.goal_for_metric(&metric_id),
        metric_id,
    };

    Ok(Json(DataResponse { data: totals }))
}
