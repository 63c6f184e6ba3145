// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{body::Bytes, http::HeaderMap, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::usecases::billing_webhook::{BillingOutcome, BillingWebhookUseCase};
use crate::domain::services::webhook_verifier::SignatureHeaders;
use crate::presentation::errors::AppError;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// 三个签名头必须同时存在
fn signature_headers(headers: &HeaderMap) -> Option<SignatureHeaders> {
    Some(SignatureHeaders {
        id: header(headers, "svix-id")?,
        timestamp: header(headers, "svix-timestamp")?,
        signature: header(headers, "svix-signature")?,
    })
}

/// 计费供应商回调
pub async fn receive(
    Extension(use_case): Extension<Arc<BillingWebhookUseCase>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let outcome = use_case
        .execute(signature_headers(&headers), &body)
        .await?;

    Ok(Json(json!({
        "received": true,
        "handled": outcome == BillingOutcome::Handled,
    })))
}
