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

use anyhow::Context;
use metrics::counter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::usecases::UseCaseError;
use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::report::{ScrapingData, SeoReport};
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::services::llm_service::LlmService;
use crate::infrastructure::metrics::{JOBS_FINISHED_TOTAL, SCRAPER_WEBHOOKS_TOTAL};

/// 抓取供应商回调用例
///
/// 保存原始结果后同步调用 LLM 生成报告；任何生成或校验错误都写入任务，
/// 不重试。
pub struct ProcessScraperWebhookUseCase {
    jobs: Arc<dyn ScrapingJobRepository>,
    llm: Arc<dyn LlmService>,
}

/// 回调负载统一为数组
fn normalize_results(payload: Value) -> Value {
    match payload {
        Value::Array(_) => payload,
        other => Value::Array(vec![other]),
    }
}

impl ProcessScraperWebhookUseCase {
    pub fn new(jobs: Arc<dyn ScrapingJobRepository>, llm: Arc<dyn LlmService>) -> Self {
        Self { jobs, llm }
    }

    pub async fn execute(
        &self,
        job_id: Option<&str>,
        payload: Value,
    ) -> Result<ScrapingJob, UseCaseError> {
        let raw_id = job_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| UseCaseError::validation("No job ID found"))?;
        let job_id = Uuid::parse_str(raw_id)
            .map_err(|_| UseCaseError::validation(format!("Invalid job ID: {}", raw_id)))?;

        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(format!("No job found for job ID: {}", job_id)))?;

        counter!(SCRAPER_WEBHOOKS_TOTAL).increment(1);

        if job.status.is_terminal() || job.status == JobStatus::Analyzing {
            warn!(%job_id, status = %job.status, "Duplicate scraper callback ignored");
            return Ok(job);
        }

        let results = normalize_results(payload);
        let records = ScrapingData::collect(&results);
        info!(
            %job_id,
            entries = results.as_array().map(Vec::len).unwrap_or(0),
            sources = records.iter().map(|r| r.sources.len()).sum::<usize>(),
            "Scraper results received"
        );

        let analyzing = job.begin_analysis(results.clone())?;
        let Some(analyzing) = self
            .jobs
            .update_if_status(&analyzing, &[JobStatus::Pending, JobStatus::Running])
            .await?
        else {
            warn!(%job_id, "Job advanced concurrently, scraper callback ignored");
            return self.current(job_id).await;
        };

        let (finished, outcome) = match self.build_report(&results).await {
            Ok(report) => {
                info!(%job_id, "SEO report generated");
                (analyzing.clone().complete(report)?, "completed")
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(%job_id, error = %message, "SEO report generation failed");
                (analyzing.clone().fail(message)?, "failed")
            }
        };

        match self
            .jobs
            .update_if_status(&finished, &[JobStatus::Analyzing])
            .await
        {
            Ok(Some(job)) => {
                counter!(JOBS_FINISHED_TOTAL, "status" => outcome).increment(1);
                Ok(job)
            }
            Ok(None) => self.current(job_id).await,
            Err(e) => {
                error!(%job_id, error = %e, "Failed to store job outcome");
                let failed = analyzing.fail(format!("Failed to store job outcome: {}", e))?;
                match self.jobs.update(&failed).await {
                    Ok(_) => {
                        counter!(JOBS_FINISHED_TOTAL, "status" => "failed").increment(1);
                    }
                    Err(write_err) => {
                        error!(%job_id, error = %write_err, "Job left in analyzing state");
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn current(&self, job_id: Uuid) -> Result<ScrapingJob, UseCaseError> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(format!("No job found for job ID: {}", job_id)))
    }

    async fn build_report(&self, results: &Value) -> anyhow::Result<Value> {
        let (raw, _usage) = self.llm.generate_report(results).await?;
        let report = SeoReport::parse(raw).context("Generated report is invalid")?;
        Ok(report.to_value()?)
    }
}
