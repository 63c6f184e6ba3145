// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serplens::presentation::routes;
use tower::util::ServiceExt;

/// 健康检查测试
///
/// 健康检查不依赖任何用例
#[tokio::test]
async fn health_check_works() {
    let app = routes::routes();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// 缺少用户头时在访问用例之前就返回 401
#[tokio::test]
async fn jobs_endpoint_returns_401_without_user() {
    let app = routes::routes();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_routes_require_user_header() {
    let app = create_test_app().await;

    let response = app.server.get("/v1/subscription").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing or invalid X-User-Id header");
}
