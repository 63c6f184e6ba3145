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

use axum::{body::Bytes, extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::application::usecases::process_scraper_webhook::ProcessScraperWebhookUseCase;
use crate::application::usecases::UseCaseError;
use crate::presentation::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct ScraperWebhookQuery {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
}

/// 抓取供应商回调
///
/// 在任务记录反映处理结果后才返回 200。
pub async fn receive(
    Extension(use_case): Extension<Arc<ProcessScraperWebhookUseCase>>,
    Query(query): Query<ScraperWebhookQuery>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    debug!(job_id = ?query.job_id, bytes = body.len(), "Scraper webhook received");

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| UseCaseError::validation(format!("Invalid JSON payload: {}", e)))?;

    let job = use_case.execute(query.job_id.as_deref(), payload).await?;

    Ok(Json(json!({
        "success": true,
        "job_id": job.id,
        "status": job.status,
    })))
}
