//! Per-user routes, nested under `/users/{user_id}`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{badges, entries, metric_config, profile};
use crate::state::AppState;

/// ```text
/// GET    /profile                                       -> profile::get_profile
/// PUT    /profile                                       -> profile::put_profile
/// GET    /metric-config/{kind}                          -> metric_config::get_metric_config
/// PUT    /metric-config/{kind}                          -> metric_config::put_metric_config
/// GET    /entries/{kind}                                -> entries::list_entries
/// GET    /entries/{kind}/{date}                         -> entries::get_entry
/// PUT    /entries/{kind}/{date}/metrics/{metric_id}     -> entries::put_metric
/// DELETE /entries/{kind}/{date}/metrics/{metric_id}     -> entries::delete_metric
/// GET    /entries/{kind}/totals/{metric_id}             -> entries::get_totals
/// GET    /badges                                        -> badges::list_earned
/// POST   /badges/check                                  -> badges::check_badges
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::put_profile),
        )
        .route(
            "/metric-config/{kind}",
            get(metric_config::get_metric_config).put(metric_config::put_metric_config),
        )
        .route("/entries/{kind}", get(entries::list_entries))
        .route("/entries/{kind}/totals/{metric_id}", get(entries::get_totals))
        .route("/entries/{kind}/{date}", get(entries::get_entry))
        .route(
            "/entries/{kind}/{date}/metrics/{metric_id}",
            put(entries::put_metric).delete(entries::delete_metric),
        )
        .route("/badges", get(badges::list_earned))
        .route("/badges/check", post(badges::check_badges))
}
