//! Integration tests for badge checks and earned badges.

mod common;

use axum::http::StatusCode;
use chrono::{Days, NaiveDate, Utc};
use common::{body_json, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Log hydration and mood for each of the last `days` days, today included.
async fn log_recent_days(pool: &PgPool, user_id: i64, days: u64) {
    log_days_ending(pool, user_id, Utc::now().date_naive(), days).await;
}

/// Log hydration and mood for `days` consecutive days ending on `last`.
async fn log_days_ending(pool: &PgPool, user_id: i64, last: NaiveDate, days: u64) {
    for offset in 0..days {
        let date = last - Days::new(offset);
        for (metric, value) in [("hydration", 2), ("mood", 4)] {
            let app = common::build_test_app(pool.clone());
            let response = put_json(
                app,
                &format!("/api/v1/users/{user_id}/entries/body/{date}/metrics/{metric}"),
                json!({"value": value}),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}

fn ids(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_awards_once_and_renders_messages(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        "/api/v1/users/8/profile",
        json!({"username": "Riley", "sport": "lacrosse", "weight": 70, "age": 17}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        "/api/v1/users/8/metric-config/body",
        json!({"selectedMetricIds": ["hydration", "mood"]}),
    )
    .await;
    log_recent_days(&pool, 8, 3).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/users/8/badges/check", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(ids(&json), vec!["streak-3", "complete-day"]);
    let message = json["data"][0]["message"].as_str().unwrap();
    assert!(message.contains("Riley"), "message should greet the user: {message}");

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_json(app, "/api/v1/users/8/badges/check", json!({})).await).await;
    assert!(ids(&json).is_empty(), "second check must not re-award");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/users/8/badges").await).await;
    let earned = json["data"].as_array().unwrap();
    assert_eq!(earned.len(), 2);
    assert!(earned.iter().all(|b| b["badge"]["name"].is_string()));
    assert!(earned.iter().all(|b| b["earnedAt"].is_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tracked_metric_count_override(pool: PgPool) {
    log_recent_days(&pool, 9, 1).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        post_json(
            app,
            "/api/v1/users/9/badges/check?tracked_metric_count=3",
            json!({}),
        )
        .await,
    )
    .await;
    assert!(ids(&json).is_empty());

    let app = common::build_test_app(pool);
    let json = body_json(
        post_json(
            app,
            "/api/v1/users/9/badges/check?tracked_metric_count=2",
            json!({}),
        )
        .await,
    )
    .await;
    assert_eq!(ids(&json), vec!["complete-day"]);
    assert!(json["data"][0]["message"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_ending_weeks_ago_still_earns_streak(pool: PgPool) {
    // History is the last N entries by count, not the last N calendar days.
    let last = Utc::now().date_naive() - Days::new(31);
    log_days_ending(&pool, 11, last, 3).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users/11/badges/check?tracked_metric_count=2",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    // Nothing was logged today, so only the streak qualifies.
    assert_eq!(ids(&json), vec!["streak-3"]);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/users/11/badges").await).await;
    assert_eq!(json["data"][0]["badgeId"], "streak-3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn no_entries_no_badges(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let json = body_json(post_json(app, "/api/v1/users/10/badges/check", json!({})).await).await;
    assert!(ids(&json).is_empty());

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/users/10/badges").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
