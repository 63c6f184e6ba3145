// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, TestApp, USER_ID};
use axum::http::StatusCode;
use serde_json::{json, Value};
use serplens::domain::models::subscription::SubscriptionPlan;
use serplens::domain::services::llm_service::CHAT_FALLBACK_REPLY;
use uuid::Uuid;

/// 准备一份已完成报告，并把 LLM 切换为对话回复
async fn chat_ready_app(reply: &str) -> (TestApp, Uuid) {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;
    let job_id = app.completed_job().await;
    app.llm.reset().await;
    app.mock_llm_content(reply).await;
    (app, job_id)
}

async fn send(app: &TestApp, user: &str, body: Value) -> axum_test::TestResponse {
    app.server
        .post("/v1/chat")
        .add_header("x-user-id", user)
        .json(&body)
        .await
}

/// 测试首条消息创建会话，后续消息携带完整历史与报告上下文
#[tokio::test]
async fn test_chat_conversation() {
    let (app, job_id) = chat_ready_app("Focus on local citations first.").await;

    let first = send(
        &app,
        USER_ID,
        json!({ "message": "What should I fix first?", "job_id": job_id }),
    )
    .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first: Value = first.json();
    assert_eq!(first["response"], "Focus on local citations first.");
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let second = send(
        &app,
        USER_ID,
        json!({ "message": "And after that?", "session_id": session_id }),
    )
    .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second: Value = second.json();
    assert_eq!(second["session_id"], session_id);

    let requests = app.llm.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let sent: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"].as_str().unwrap().contains("Acme Bakery"));
    assert_eq!(messages[1]["content"], "What should I fix first?");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[3]["content"], "And after that?");

    let sessions: Vec<Value> = app
        .server
        .get(&format!("/v1/jobs/{}/chat/sessions", job_id))
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["title"], "What should I fix first?");

    let history: Vec<Value> = app
        .server
        .get(&format!("/v1/chat/sessions/{}/messages", session_id))
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    let roles: Vec<&str> = history.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["user", "assistant", "user", "assistant"]);
}

#[tokio::test]
async fn test_camel_case_fields_are_accepted() {
    let (app, job_id) = chat_ready_app("Sure.").await;

    let response = send(
        &app,
        USER_ID,
        json!({ "message": "Summarize the report", "jobId": job_id }),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_completion_uses_fallback_reply() {
    let (app, job_id) = chat_ready_app("").await;

    let response: Value = send(&app, USER_ID, json!({ "message": "Hello", "job_id": job_id }))
        .await
        .json();

    assert_eq!(response["response"], CHAT_FALLBACK_REPLY);
}

#[tokio::test]
async fn test_chat_requires_pro_plan() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Starter).await;

    let response = send(
        &app,
        USER_ID,
        json!({ "message": "Hello", "job_id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "AI chat is not available on the starter plan");
    assert!(app.llm.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_request_validation() {
    let app = create_test_app().await;
    app.seed_subscription(USER_ID, SubscriptionPlan::Pro).await;

    let blank = send(&app, USER_ID, json!({ "message": "  ", "job_id": Uuid::new_v4() })).await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = blank.json();
    assert_eq!(body["error"], "Message is required");

    let no_target = send(&app, USER_ID, json!({ "message": "Hello" })).await;
    assert_eq!(no_target.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = no_target.json();
    assert_eq!(body["error"], "Session ID or Job ID is required");

    let unknown_job = send(
        &app,
        USER_ID,
        json!({ "message": "Hello", "job_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(unknown_job.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_chat_about_foreign_job() {
    let (app, job_id) = chat_ready_app("Hi").await;
    app.seed_subscription("intruder", SubscriptionPlan::Pro).await;

    let response = send(&app, "intruder", json!({ "message": "Hello", "job_id": job_id })).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rename_session() {
    let (app, job_id) = chat_ready_app("Hi").await;
    let created: Value = send(&app, USER_ID, json!({ "message": "Hello", "job_id": job_id }))
        .await
        .json();
    let session_id = created["session_id"].as_str().unwrap().to_string();

    let renamed = app
        .server
        .patch(&format!("/v1/chat/sessions/{}", session_id))
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "title": "  Citations plan  " }))
        .await;
    assert_eq!(renamed.status_code(), StatusCode::OK);
    let renamed: Value = renamed.json();
    assert_eq!(renamed["title"], "Citations plan");

    let blank = app
        .server
        .patch(&format!("/v1/chat/sessions/{}", session_id))
        .add_header("x-user-id", USER_ID)
        .json(&json!({ "title": "   " }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let foreign = app
        .server
        .patch(&format!("/v1/chat/sessions/{}", session_id))
        .add_header("x-user-id", "intruder")
        .json(&json!({ "title": "Mine now" }))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_message() {
    let (app, job_id) = chat_ready_app("Hi").await;
    let created: Value = send(&app, USER_ID, json!({ "message": "Hello", "job_id": job_id }))
        .await
        .json();
    let session_id = created["session_id"].as_str().unwrap().to_string();

    let history: Vec<Value> = app
        .server
        .get(&format!("/v1/chat/sessions/{}/messages", session_id))
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    let message_id = history[0]["id"].as_str().unwrap().to_string();

    let foreign = app
        .server
        .delete(&format!("/v1/chat/messages/{}", message_id))
        .add_header("x-user-id", "intruder")
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);

    let deleted = app
        .server
        .delete(&format!("/v1/chat/messages/{}", message_id))
        .add_header("x-user-id", USER_ID)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let remaining: Vec<Value> = app
        .server
        .get(&format!("/v1/chat/sessions/{}/messages", session_id))
        .add_header("x-user-id", USER_ID)
        .await
        .json();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["role"], "assistant");

    let again = app
        .server
        .delete(&format!("/v1/chat/messages/{}", message_id))
        .add_header("x-user-id", USER_ID)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}
