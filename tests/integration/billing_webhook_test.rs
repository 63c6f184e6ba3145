// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, create_test_app_with_billing_secret, TestApp, BILLING_SECRET, PRO_PLAN_ID,
};
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{json, Value};
use serplens::domain::models::subscription::{SubscriptionPlan, SubscriptionStatus};
use serplens::domain::services::webhook_verifier::SignatureHeaders;
use serplens::infrastructure::services::svix_verifier::SvixVerifier;

fn signed_headers(body: &str, timestamp: i64) -> SignatureHeaders {
    let signer = SvixVerifier::new(Some(BILLING_SECRET), 300).unwrap();
    let mut headers = SignatureHeaders {
        id: "msg_test_1".to_string(),
        timestamp: timestamp.to_string(),
        signature: String::new(),
    };
    headers.signature = signer.sign(&headers, body.as_bytes()).unwrap();
    headers
}

fn unverified_headers() -> SignatureHeaders {
    SignatureHeaders {
        id: "msg_test_2".to_string(),
        timestamp: Utc::now().timestamp().to_string(),
        signature: "v1,bm90LWEtc2lnbmF0dXJl".to_string(),
    }
}

async fn post_signed(app: &TestApp, body: &str, headers: &SignatureHeaders) -> axum_test::TestResponse {
    app.server
        .post("/api/billing/webhook")
        .add_header("svix-id", headers.id.clone())
        .add_header("svix-timestamp", headers.timestamp.clone())
        .add_header("svix-signature", headers.signature.clone())
        .add_header("content-type", "application/json")
        .bytes(body.to_string().into())
        .await
}

/// 测试签名正确的订阅事件写入 pro 套餐
#[tokio::test]
async fn test_signed_subscription_created() {
    let app = create_test_app_with_billing_secret(Some(BILLING_SECRET)).await;
    let start = Utc::now().timestamp();
    let body = json!({
        "type": "subscription.created",
        "data": {
            "user_id": "user_billing",
            "plan_id": PRO_PLAN_ID,
            "status": "active",
            "current_period_start": start,
            "current_period_end": start + 30 * 24 * 3600
        }
    })
    .to_string();

    let response = post_signed(&app, &body, &signed_headers(&body, start)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let result: Value = response.json();
    assert_eq!(result["received"], true);
    assert_eq!(result["handled"], true);

    let subscription = app.find_subscription("user_billing").await.unwrap();
    assert_eq!(subscription.plan, SubscriptionPlan::Pro);
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscription.current_period_start.timestamp(), start);
}

#[tokio::test]
async fn test_tampered_body_is_rejected() {
    let app = create_test_app_with_billing_secret(Some(BILLING_SECRET)).await;
    let now = Utc::now().timestamp();
    let body = json!({ "type": "user.created", "data": { "id": "user_tamper" } }).to_string();
    let headers = signed_headers(&body, now);
    let tampered = body.replace("user_tamper", "user_other");

    let response = post_signed(&app, &tampered, &headers).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.find_subscription("user_other").await.is_none());
}

#[tokio::test]
async fn test_stale_timestamp_is_rejected() {
    let app = create_test_app_with_billing_secret(Some(BILLING_SECRET)).await;
    let stale = Utc::now().timestamp() - 3600;
    let body = json!({ "type": "user.created", "data": { "id": "user_stale" } }).to_string();

    let response = post_signed(&app, &body, &signed_headers(&body, stale)).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_headers_are_rejected_when_secret_set() {
    let app = create_test_app_with_billing_secret(Some(BILLING_SECRET)).await;

    let response = app
        .server
        .post("/api/billing/webhook")
        .json(&json!({ "type": "user.created", "data": { "id": "user_1" } }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing svix headers");
}

/// 未配置密钥时同样要求签名头
#[tokio::test]
async fn test_missing_headers_are_rejected_without_secret() {
    let app = create_test_app().await;
    app.seed_subscription("user_kept", SubscriptionPlan::Pro).await;

    let response = app
        .server
        .post("/api/billing/webhook")
        .json(&json!({ "type": "subscription.deleted", "data": { "user_id": "user_kept" } }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing svix headers");
    let subscription = app.find_subscription("user_kept").await.unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Active);
}

/// 未配置密钥时不校验签名内容
#[tokio::test]
async fn test_signature_not_checked_without_secret() {
    let app = create_test_app().await;

    let body = json!({ "type": "user.created", "data": { "id": "user_new" } }).to_string();
    let created = post_signed(&app, &body, &unverified_headers()).await;
    assert_eq!(created.status_code(), StatusCode::OK);

    let subscription = app.find_subscription("user_new").await.unwrap();
    assert_eq!(subscription.plan, SubscriptionPlan::Free);
    assert_eq!(subscription.reports_used_this_month, 0);

    let body = json!({
        "type": "subscription.updated",
        "data": { "user_id": "user_new", "plan_id": "plan_starter", "status": "past_due" }
    })
    .to_string();
    let upgraded = post_signed(&app, &body, &unverified_headers()).await;
    assert_eq!(upgraded.status_code(), StatusCode::OK);

    let subscription = app.find_subscription("user_new").await.unwrap();
    assert_eq!(subscription.plan, SubscriptionPlan::Starter);
    assert_eq!(subscription.status, SubscriptionStatus::PastDue);
}

#[tokio::test]
async fn test_subscription_deleted_cancels() {
    let app = create_test_app().await;
    app.seed_subscription("user_leaving", SubscriptionPlan::Pro).await;

    let body = json!({ "type": "subscription.deleted", "data": { "user_id": "user_leaving" } })
        .to_string();
    let response = post_signed(&app, &body, &unverified_headers()).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let subscription = app.find_subscription("user_leaving").await.unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Canceled);
    assert_eq!(subscription.effective_plan(), SubscriptionPlan::Free);
}

#[tokio::test]
async fn test_unknown_event_is_acknowledged() {
    let app = create_test_app().await;

    let body = json!({ "type": "invoice.paid", "data": {} }).to_string();
    let response = post_signed(&app, &body, &unverified_headers()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["handled"], false);
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let app = create_test_app().await;

    let response = post_signed(&app, "{not json", &unverified_headers()).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
