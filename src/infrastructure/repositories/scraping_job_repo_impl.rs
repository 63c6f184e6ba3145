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

use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scraping_job as job_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
#[derive(Clone)]
pub struct ScrapingJobRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ScrapingJobRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for ScrapingJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            prompt: model.prompt,
            snapshot_id: model.snapshot_id,
            status: model.status.parse().unwrap_or_default(),
            results: model.results,
            seo_report: model.seo_report,
            error: model.error,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            completed_at: model.completed_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

impl From<ScrapingJob> for job_entity::ActiveModel {
    fn from(job: ScrapingJob) -> Self {
        Self {
            id: Set(job.id),
            user_id: Set(job.user_id),
            prompt: Set(job.prompt),
            snapshot_id: Set(job.snapshot_id),
            status: Set(job.status.to_string()),
            results: Set(job.results),
            seo_report: Set(job.seo_report),
            error: Set(job.error),
            created_at: Set(job.created_at.into()),
            updated_at: Set(job.updated_at.into()),
            completed_at: Set(job.completed_at.map(Into::into)),
        }
    }
}

#[async_trait]
impl ScrapingJobRepository for ScrapingJobRepositoryImpl {
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_snapshot_id(
        &self,
        snapshot_id: &str,
    ) -> Result<Option<ScrapingJob>, RepositoryError> {
        let model = job_entity::Entity::find()
            .filter(job_entity::Column::SnapshotId.eq(snapshot_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ScrapingJob>, RepositoryError> {
        let models = job_entity::Entity::find()
            .filter(job_entity::Column::UserId.eq(user_id))
            .order_by_desc(job_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();
        // 创建时间与所有者不随更新变化
        model.created_at = NotSet;
        model.user_id = NotSet;

        let updated = model.update(self.db.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        })?;
        Ok(updated.into())
    }

    async fn update_if_status(
        &self,
        job: &ScrapingJob,
        expected: &[JobStatus],
    ) -> Result<Option<ScrapingJob>, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();
        model.id = NotSet;
        model.created_at = NotSet;
        model.user_id = NotSet;

        let result = job_entity::Entity::update_many()
            .set(model)
            .filter(job_entity::Column::Id.eq(job.id))
            .filter(job_entity::Column::Status.is_in(expected.iter().map(JobStatus::as_str)))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(job.id).await
    }

    async fn set_snapshot_id(&self, id: Uuid, snapshot_id: &str) -> Result<(), RepositoryError> {
        job_entity::Entity::update_many()
            .col_expr(job_entity::Column::SnapshotId, Expr::value(snapshot_id.to_string()))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::SnapshotId.is_null())
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
