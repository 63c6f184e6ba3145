// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, report_fixture, scraper_results, USER_ID};
use axum::http::StatusCode;
use serde_json::{json, Value};
use serplens::domain::models::scraping_job::JobStatus;
use serplens::domain::models::subscription::SubscriptionPlan;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// 测试完整流程：回调结果经 LLM 生成报告，任务完成
#[tokio::test]
async fn test_callback_completes_job_with_report() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_flow").await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": report_fixture().to_string() } }],
            "usage": { "prompt_tokens": 900, "completion_tokens": 700, "total_tokens": 1600 }
        })))
        .expect(1)
        .mount(&app.llm)
        .await;

    let job_id = app.start_report("Acme Bakery").await;

    let response = app
        .server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .json(&scraper_results())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "completed");

    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.completed_at.is_some());
    assert_eq!(job.results.unwrap(), scraper_results());
    let report = job.seo_report.unwrap();
    assert_eq!(report["meta"]["entity_name"], "Acme Bakery");
    assert_eq!(report["summary"]["overall_score"].as_f64(), Some(62.0));
    assert_eq!(report["meta"]["data_sources_count"].as_f64(), Some(4.0));

    // 报告提示词里带着原始抓取结果
    let requests = app.llm.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("Acme Bakery is a bakery in Portland"));

    let fetched: Value = app
        .server
        .get(&format!("/v1/jobs/{}", job_id))
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert_eq!(fetched["status"], "completed");
    assert_eq!(fetched["seo_report"]["competitors"].as_array().unwrap().len(), 3);
}

/// 单个对象形式的回调也按一条结果处理
#[tokio::test]
async fn test_single_object_payload_is_wrapped() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_single").await;
    app.mock_llm_content(&report_fixture().to_string()).await;

    let job_id = app.start_report("Acme Bakery").await;
    let entry = scraper_results()[0].clone();

    app.server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .json(&entry)
        .await
        .assert_status_ok();

    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.results.unwrap(), json!([entry]));
    assert_eq!(job.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_invalid_report_marks_job_failed() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_invalid").await;

    let mut report = report_fixture();
    report["summary"]["overall_score"] = json!(140);
    app.mock_llm_content(&report.to_string()).await;

    let job_id = app.start_report("Acme Bakery").await;

    let response = app
        .server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .json(&scraper_results())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "failed");

    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.seo_report.is_none());
    assert!(job
        .error
        .unwrap()
        .starts_with("Generated report is invalid"));
    // 原始结果仍然保留
    assert!(job.results.is_some());
}

#[tokio::test]
async fn test_llm_error_marks_job_failed() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_llm_down").await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&app.llm)
        .await;

    let job_id = app.start_report("Acme Bakery").await;
    app.server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .json(&scraper_results())
        .await
        .assert_status_ok();

    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("LLM API returned error"));
}

/// 重复回调不会再次调用 LLM
#[tokio::test]
async fn test_duplicate_callback_is_acknowledged() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    let job_id = app.completed_job().await;

    let response = app
        .server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .json(&json!([{ "answer_text": "late duplicate" }]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(app.llm.received_requests().await.unwrap().len(), 1);

    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.results.unwrap(), scraper_results());
}

#[tokio::test]
async fn test_callback_errors() {
    let app = create_test_app().await;

    let missing = app.server.post("/api/webhook").json(&json!([])).await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json();
    assert_eq!(body["error"], "No job ID found");

    let malformed = app
        .server
        .post("/api/webhook?jobId=not-a-uuid")
        .json(&json!([]))
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    let unknown_id = Uuid::new_v4();
    let unknown = app
        .server
        .post(&format!("/api/webhook?jobId={}", unknown_id))
        .json(&json!([]))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json();
    assert_eq!(
        body["error"],
        format!("No job found for job ID: {}", unknown_id)
    );
}

/// 非 JSON 的回调体被拒绝，任务保持原状
#[tokio::test]
async fn test_invalid_json_leaves_job_running() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    app.mock_scraper_accepts("s_garbage").await;
    let job_id = app.start_report("Acme Bakery").await;

    let response = app
        .server
        .post(&format!("/api/webhook?jobId={}", job_id))
        .text("not json at all")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let job = app.find_job(job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Running);
}
