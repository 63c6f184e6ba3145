// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};

/// 发起报告请求，提示词按字符计数不超过 500
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct StartReportRequest {
    #[validate(length(min = 1, max = 500, message = "Prompt must be 1 to 500 characters"))]
    pub prompt: String,
}

/// 发起报告后的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartReportResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ScrapingJob> for StartReportResponse {
    fn from(job: &ScrapingJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            snapshot_id: job.snapshot_id.clone(),
            error: job.error.clone(),
        }
    }
}

/// 任务详情，供仪表盘轮询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub prompt: String,
    pub snapshot_id: Option<String>,
    pub status: JobStatus,
    pub results: Option<Value>,
    pub seo_report: Option<Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScrapingJob> for JobResponse {
    fn from(job: ScrapingJob) -> Self {
        Self {
            id: job.id,
            prompt: job.prompt,
            snapshot_id: job.snapshot_id,
            status: job.status,
            results: job.results,
            seo_report: job.seo_report,
            error: job.error,
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
        }
    }
}

/// 任务列表条目，不含原始结果与报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub prompt: String,
    pub status: JobStatus,
    pub has_report: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScrapingJob> for JobSummary {
    fn from(job: ScrapingJob) -> Self {
        Self {
            id: job.id,
            has_report: job.seo_report.is_some(),
            prompt: job.prompt,
            status: job.status,
            error: job.error,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}
