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

use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::job::{JobResponse, JobSummary, StartReportRequest};
use crate::application::usecases::subscriptions::SubscriptionUseCase;
use crate::application::usecases::UseCaseError;
use crate::domain::errors::DomainError;
use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::prompts::build_research_prompt;
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::services::scraper_service::ScraperService;
use crate::infrastructure::metrics::{JOBS_CREATED_TOTAL, JOBS_FINISHED_TOTAL};

/// 发起报告与查询任务的用例
pub struct StartReportUseCase {
    jobs: Arc<dyn ScrapingJobRepository>,
    scraper: Arc<dyn ScraperService>,
    subscriptions: Arc<SubscriptionUseCase>,
}

impl StartReportUseCase {
    pub fn new(
        jobs: Arc<dyn ScrapingJobRepository>,
        scraper: Arc<dyn ScraperService>,
        subscriptions: Arc<SubscriptionUseCase>,
    ) -> Self {
        Self {
            jobs,
            scraper,
            subscriptions,
        }
    }

    /// 发起一次报告
    ///
    /// 返回的任务要么处于 running（供应商已受理），要么处于 failed
    /// （触发失败，`error` 中保存失败原因）。回调先于触发结果到达时，
    /// 返回回调推进后的任务。额度在创建任务前占用，触发失败时归还。
    pub async fn execute(
        &self,
        user_id: &str,
        request: StartReportRequest,
    ) -> Result<ScrapingJob, UseCaseError> {
        if request.prompt.trim().is_empty() {
            return Err(UseCaseError::validation("Prompt is required"));
        }
        request
            .validate()
            .map_err(|e| UseCaseError::validation(e.to_string()))?;

        self.subscriptions.record_report(user_id).await?;

        let prompt = request.prompt.trim().to_string();
        let job = match self.jobs.create(&ScrapingJob::new(user_id, &prompt)).await {
            Ok(job) => job,
            Err(e) => {
                self.release_report(user_id).await;
                return Err(e.into());
            }
        };
        counter!(JOBS_CREATED_TOTAL).increment(1);
        info!(job_id = %job.id, user_id, "Report job created");

        match self
            .scraper
            .trigger(job.id, &build_research_prompt(&prompt))
            .await
        {
            Ok(response) => {
                let snapshot_id = response.snapshot_id;
                let started = job.clone().start(snapshot_id.clone())?;
                if let Some(started) = self
                    .jobs
                    .update_if_status(&started, &[JobStatus::Pending])
                    .await?
                {
                    return Ok(started);
                }

                // 回调已推进任务，只补写快照ID
                warn!(job_id = %job.id, "Scraper callback arrived before trigger completed");
                if let Some(snapshot_id) = snapshot_id {
                    self.jobs.set_snapshot_id(job.id, &snapshot_id).await?;
                }
                self.current(job.id).await
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(job_id = %job.id, error = %message, "Scraper trigger failed");
                let failed = job.clone().fail(message)?;
                match self
                    .jobs
                    .update_if_status(&failed, &[JobStatus::Pending])
                    .await?
                {
                    Some(failed) => {
                        self.release_report(user_id).await;
                        counter!(JOBS_FINISHED_TOTAL, "status" => "failed").increment(1);
                        Ok(failed)
                    }
                    None => self.current(job.id).await,
                }
            }
        }
    }

    async fn current(&self, job_id: Uuid) -> Result<ScrapingJob, UseCaseError> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Job not found"))
    }

    async fn release_report(&self, user_id: &str) {
        if let Err(e) = self.subscriptions.release_report(user_id).await {
            error!(user_id, error = %e, "Failed to release reserved report");
        }
    }

    /// 查询任务，只允许所有者访问
    pub async fn get_job(&self, user_id: &str, job_id: Uuid) -> Result<JobResponse, UseCaseError> {
        let job = self.owned_job(user_id, job_id).await?;
        Ok(job.into())
    }

    pub async fn get_job_by_snapshot(
        &self,
        user_id: &str,
        snapshot_id: &str,
    ) -> Result<JobResponse, UseCaseError> {
        let job = self
            .jobs
            .find_by_snapshot_id(snapshot_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Job not found"))?;
        if !job.is_owned_by(user_id) {
            return Err(DomainError::Forbidden.into());
        }
        Ok(job.into())
    }

    pub async fn list_jobs(&self, user_id: &str) -> Result<Vec<JobSummary>, UseCaseError> {
        let jobs = self.jobs.find_by_user(user_id).await?;
        Ok(jobs.into_iter().map(Into::into).collect())
    }

    pub(crate) async fn owned_job(
        &self,
        user_id: &str,
        job_id: Uuid,
    ) -> Result<ScrapingJob, UseCaseError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Job not found"))?;
        if !job.is_owned_by(user_id) {
            return Err(DomainError::Forbidden.into());
        }
        Ok(job)
    }
}
