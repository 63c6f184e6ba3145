// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 抓取任务仓库特质
#[async_trait]
pub trait ScrapingJobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError>;
    /// 根据供应商快照ID查找任务
    async fn find_by_snapshot_id(
        &self,
        snapshot_id: &str,
    ) -> Result<Option<ScrapingJob>, RepositoryError>;
    /// 用户的全部任务，按创建时间倒序
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ScrapingJob>, RepositoryError>;
    /// 更新任务
    async fn update(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError>;
    /// 仅当存储中的状态属于 `expected` 时写入任务
    ///
    /// 状态已被其他写入推进时返回 `None`，不做任何修改。
    async fn update_if_status(
        &self,
        job: &ScrapingJob,
        expected: &[JobStatus],
    ) -> Result<Option<ScrapingJob>, RepositoryError>;
    /// 补写快照ID，已有快照ID时保持不变
    async fn set_snapshot_id(&self, id: Uuid, snapshot_id: &str) -> Result<(), RepositoryError>;
}
