// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, USER_ID};
use axum::http::StatusCode;
use serde_json::{json, Value};
use serplens::domain::models::scraping_job::JobStatus;
use serplens::domain::models::subscription::SubscriptionPlan;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// 测试发起报告
///
/// 供应商受理后任务进入 running，保存快照 ID，并计入当月额度。
#[tokio::test]
async fn test_start_report_triggers_scraper() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Starter).await;

    Mock::given(method("POST"))
        .and(path("/datasets/v3/trigger"))
        .and(query_param("dataset_id", "gd_test"))
        .and(header("authorization", "Bearer bd-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s_abc" })))
        .expect(1)
        .mount(&app.scraper)
        .await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "  Acme Bakery  " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["snapshot_id"], "s_abc");

    let job_id = Uuid::parse_str(body["job_id"].as_str().unwrap()).unwrap();
    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.prompt, "Acme Bakery");
    assert_eq!(job.user_id, USER_ID);

    // 供应商收到的是研究提示词，回调地址带上任务 ID
    let requests = app.scraper.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent["input"][0]["prompt"]
        .as_str()
        .unwrap()
        .contains("Acme Bakery"));
    let endpoint = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "endpoint")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(endpoint.ends_with(&format!("/api/webhook?jobId={}", job_id)));

    let subscription = app.find_subscription(USER_ID).await.unwrap();
    assert_eq!(subscription.reports_used_this_month, 1);
}

#[tokio::test]
async fn test_blank_prompt_is_rejected() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Prompt is required");
    assert!(app.scraper.received_requests().await.unwrap().is_empty());
}

/// 免费套餐没有报告额度，不应创建任务
#[tokio::test]
async fn test_free_plan_quota_blocks_report() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "Acme Bakery" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
    assert!(app.scraper.received_requests().await.unwrap().is_empty());

    let jobs: Vec<Value> = app
        .server
        .get("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert!(jobs.is_empty());
}

/// 触发失败时任务记为 failed，且不计入额度
#[tokio::test]
async fn test_scraper_rejection_marks_job_failed() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Starter).await;

    Mock::given(method("POST"))
        .and(path("/datasets/v3/trigger"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&app.scraper)
        .await;

    let response = app
        .server
        .post("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "prompt": "Acme Bakery" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().unwrap().contains("HTTP 401"));

    let job_id = Uuid::parse_str(body["job_id"].as_str().unwrap()).unwrap();
    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("invalid token"));

    let subscription = app.find_subscription(USER_ID).await.unwrap();
    assert_eq!(subscription.reports_used_this_month, 0);
}

#[tokio::test]
async fn test_jobs_are_scoped_to_owner() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_owner").await;

    let first = app.start_report("First bakery").await;
    let second = app.start_report("Second bakery").await;

    let jobs: Vec<Value> = app
        .server
        .get("/v1/jobs")
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["id"], second.to_string());
    assert_eq!(jobs[1]["id"], first.to_string());
    assert_eq!(jobs[0]["has_report"], false);

    let own = app
        .server
        .get(&format!("/v1/jobs/{}", first))
        .add_header("x-user-id", USER_ID)
        .await;
    assert_eq!(own.status_code(), StatusCode::OK);
    let own: Value = own.json();
    assert_eq!(own["prompt"], "First bakery");

    let foreign = app
        .server
        .get(&format!("/v1/jobs/{}", first))
        .add_header("x-user-id", "someone_else")
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);

    let others: Vec<Value> = app
        .server
        .get("/v1/jobs")
        .add_header("x-user-id", "someone_else")
        .await
        .json();
    assert!(others.is_empty());

    let missing = app
        .server
        .get(&format!("/v1/jobs/{}", Uuid::new_v4()))
        .add_header("x-user-id", USER_ID)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_job_by_snapshot() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_lookup").await;

    let job_id = app.start_report("Acme Bakery").await;

    let response = app
        .server
        .get("/v1/jobs/snapshot/s_lookup")
        .add_header("x-user-id", USER_ID)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"], job_id.to_string());
    assert_eq!(body["snapshot_id"], "s_lookup");
}
