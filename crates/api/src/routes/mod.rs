pub mod health;
pub mod reference;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /badges                                          badge catalog
/// /metrics                                         built-in metric definitions
/// /sports/{sport}/defaults                         default metric selection
///
/// /users/{user_id}/profile                         get, replace
/// /users/{user_id}/metric-config/{kind}            get, replace
/// /users/{user_id}/entries/{kind}                  recent entries
/// /users/{user_id}/entries/{kind}/{date}           single entry
/// /users/{user_id}/entries/{kind}/{date}/metrics/{metric_id}
///                                                  log (PUT), clear (DELETE)
/// /users/{user_id}/entries/{kind}/totals/{metric_id}
///                                                  total, average and goal
/// /users/{user_id}/badges                          earned badges
/// /users/{user_id}/badges/check                    award newly earned (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(reference::router())
        .nest("/users/{user_id}", users::router())
}
