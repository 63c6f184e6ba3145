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

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::job::{
    JobResponse, JobSummary, StartReportRequest, StartReportResponse,
};
use crate::application::usecases::start_report::StartReportUseCase;
use crate::domain::models::scraping_job::JobStatus;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::user_id::UserId;

/// 发起报告
///
/// 供应商受理时返回 201；触发失败时任务已记为 failed，返回 502 并附带任务 ID。
pub async fn create_job(
    user: UserId,
    Extension(use_case): Extension<Arc<StartReportUseCase>>,
    Json(payload): Json<StartReportRequest>,
) -> Result<Response, AppError> {
    let job = use_case.execute(user.as_str(), payload).await?;

    if job.status == JobStatus::Failed {
        let body = Json(json!({
            "error": job.error.clone().unwrap_or_default(),
            "job_id": job.id,
            "status": job.status,
        }));
        return Ok((StatusCode::BAD_GATEWAY, body).into_response());
    }

    Ok((
        StatusCode::CREATED,
        Json(StartReportResponse::from(&job)),
    )
        .into_response())
}

pub async fn list_jobs(
    user: UserId,
    Extension(use_case): Extension<Arc<StartReportUseCase>>,
) -> Result<Json<Vec<JobSummary>>, AppError> {
    Ok(Json(use_case.list_jobs(user.as_str()).await?))
}

pub async fn get_job(
    user: UserId,
    Extension(use_case): Extension<Arc<StartReportUseCase>>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    Ok(Json(use_case.get_job(user.as_str(), id).await?))
}

pub async fn get_job_by_snapshot(
    user: UserId,
    Extension(use_case): Extension<Arc<StartReportUseCase>>,
    Path(snapshot_id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    Ok(Json(
        use_case
            .get_job_by_snapshot(user.as_str(), &snapshot_id)
            .await?,
    ))
}
