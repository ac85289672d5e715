//! Handlers for read-only reference data.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use stride_core::metrics::default_metrics;
use stride_core::profile::Sport;
use stride_core::sports::sport_defaults;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /badges
pub async fn list_badges(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.catalog.as_slice().to_vec(),
    })
}

/// GET /metrics
pub async fn list_metrics() -> impl IntoResponse {
    Json(DataResponse {
        data: default_metrics(),
    })
}

/// GET /sports/{sport}/defaults
pub async fn get_sport_defaults(Path(sport): Path<String>) -> AppResult<impl IntoResponse> {
    let sport = Sport::from_str_value(&sport)?;
    Ok(Json(DataResponse {
        data: sport_defaults(sport),
    }))
}
