// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, USER_ID};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use serplens::domain::models::subscription::SubscriptionPlan;

/// 首次查询时补建免费订阅
#[tokio::test]
async fn test_summary_initializes_free_plan() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/v1/subscription")
        .add_header("x-user-id", USER_ID)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["plan"], "free");
    assert_eq!(body["status"], "active");
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["features"]["ai_chat_enabled"], false);

    assert!(app.find_subscription(USER_ID).await.is_some());
}

#[tokio::test]
async fn test_starter_usage_counts_down() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Starter).await;
    app.mock_scraper_accepts("s_usage").await;

    app.start_report("Acme Bakery").await;
    app.start_report("Acme Bakery downtown").await;

    let body: Value = app
        .server
        .get("/v1/subscription")
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert_eq!(body["plan"], "starter");
    assert_eq!(body["reports_used"], 2);
    assert_eq!(body["remaining"], 8);
}

#[tokio::test]
async fn test_pro_plan_is_unlimited() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;

    let body: Value = app
        .server
        .get("/v1/subscription")
        .add_header("x-user-id", USER_ID)
        .await
        .json();

    assert_eq!(body["plan"], "pro");
    assert_eq!(body["remaining"], Value::Null);
    assert_eq!(body["features"]["ai_chat_enabled"], true);
}

/// 跨月后用量清零，额度重新可用
#[tokio::test]
async fn test_exhausted_quota_resets_next_month() {
    let app = create_test_app().await;
    app.seed_subscription_with_usage(
        USER_ID,
        SubscriptionPlan::Starter,
        10,
        Utc::now() - Duration::days(40),
    )
    .await;

    app.mock_scraper_accepts("s_reset").await;
    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "Acme Bakery" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let subscription = app.find_subscription(USER_ID).await.unwrap();
    assert_eq!(subscription.reports_used_this_month, 1);
}

#[tokio::test]
async fn test_exhausted_quota_blocks_within_month() {
    let app = create_test_app().await;
    app.seed_subscription_with_usage(USER_ID, SubscriptionPlan::Starter, 10, Utc::now())
        .await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "Acme Bakery" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("10/10"));
}

/// 最后一份额度被并发请求争用时只有一个成功
#[tokio::test]
async fn test_last_report_cannot_be_started_twice() {
    let app = create_test_app().await;
    app.seed_subscription_with_usage(USER_ID, SubscriptionPlan::Starter, 9, Utc::now())
        .await;
    app.mock_scraper_accepts("s_race").await;

    let start = |prompt: &'static str| {
        let server = &app.server;
        async move {
            server
                .post("/v1/jobs")
                .add_header("x-user-id", USER_ID)
                .json(&json!({ "prompt": prompt }))
                .await
                .status_code()
        }
    };
    let (first, second) = tokio::join!(start("Acme Bakery"), start("Acme Bakery downtown"));

    let mut statuses = [first, second];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::PAYMENT_REQUIRED]);

    let subscription = app.find_subscription(USER_ID).await.unwrap();
    assert_eq!(subscription.reports_used_this_month, 10);
}
