//! Read-only reference data.

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// ```text
/// GET    /badges                    -> list_badges
/// GET    /metrics                   -> list_metrics
/// GET    /sports/{sport}/defaults   -> get_sport_defaults
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/badges", get(reference::list_badges))
        .route("/metrics", get(reference::list_metrics))
        .route("/sports/{sport}/defaults", get(reference::get_sport_defaults))
}
