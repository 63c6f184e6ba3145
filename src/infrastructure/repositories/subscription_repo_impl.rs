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

use crate::domain::models::subscription::UserSubscription;
use crate::domain::repositories::subscription_repository::SubscriptionRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::user_subscription as sub_entity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::sync::Arc;

/// 订阅仓库实现
#[derive(Clone)]
pub struct SubscriptionRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<sub_entity::Model> for UserSubscription {
    type Error = RepositoryError;

    fn try_from(model: sub_entity::Model) -> Result<Self, Self::Error> {
        let plan = model
            .plan
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("unknown plan '{}'", model.plan)))?;
        let status = model
            .status
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("unknown status '{}'", model.status)))?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            plan,
            status,
            current_period_start: model.current_period_start.with_timezone(&Utc),
            current_period_end: model.current_period_end.with_timezone(&Utc),
            reports_used_this_month: model.reports_used_this_month.max(0) as u32,
            last_reset_date: model.last_reset_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

impl From<UserSubscription> for sub_entity::ActiveModel {
    fn from(sub: UserSubscription) -> Self {
        Self {
            id: Set(sub.id),
            user_id: Set(sub.user_id),
            plan: Set(sub.plan.to_string()),
            status: Set(sub.status.to_string()),
            current_period_start: Set(sub.current_period_start.into()),
            current_period_end: Set(sub.current_period_end.into()),
            reports_used_this_month: Set(sub.reports_used_this_month.min(i32::MAX as u32) as i32),
            last_reset_date: Set(sub.last_reset_date.into()),
            created_at: Set(sub.created_at.into()),
            updated_at: Set(sub.updated_at.into()),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn find_by_user(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSubscription>, RepositoryError> {
        sub_entity::Entity::find()
            .filter(sub_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn create(
        &self,
        subscription: &UserSubscription,
    ) -> Result<UserSubscription, RepositoryError> {
        let model: sub_entity::ActiveModel = subscription.clone().into();
        model.insert(self.db.as_ref()).await?.try_into()
    }

    async fn update(
        &self,
        subscription: &UserSubscription,
    ) -> Result<UserSubscription, RepositoryError> {
        let mut model: sub_entity::ActiveModel = subscription.clone().into();
        model.created_at = NotSet;
        model.reports_used_this_month = NotSet;
        model.last_reset_date = NotSet;

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => RepositoryError::NotFound,
                other => RepositoryError::Database(other),
            })?
            .try_into()
    }

    async fn try_increment_usage(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<bool, RepositoryError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut query = sub_entity::Entity::update_many()
            .col_expr(
                sub_entity::Column::ReportsUsedThisMonth,
                Expr::col(sub_entity::Column::ReportsUsedThisMonth).add(1),
            )
            .col_expr(sub_entity::Column::UpdatedAt, Expr::value(now))
            .filter(sub_entity::Column::UserId.eq(user_id));
        if let Some(limit) = limit {
            let limit = i32::try_from(limit).unwrap_or(i32::MAX);
            query = query.filter(sub_entity::Column::ReportsUsedThisMonth.lt(limit));
        }

        let result = query.exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }

    async fn decrement_usage(&self, user_id: &str) -> Result<(), RepositoryError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        sub_entity::Entity::update_many()
            .col_expr(
                sub_entity::Column::ReportsUsedThisMonth,
                Expr::col(sub_entity::Column::ReportsUsedThisMonth).sub(1),
            )
            .col_expr(sub_entity::Column::UpdatedAt, Expr::value(now))
            .filter(sub_entity::Column::UserId.eq(user_id))
            .filter(sub_entity::Column::ReportsUsedThisMonth.gt(0))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn reset_usage(
        &self,
        user_id: &str,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let month_start: DateTimeWithTimeZone = month_start.into();
        let now: DateTimeWithTimeZone = now.into();
        let result = sub_entity::Entity::update_many()
            .col_expr(sub_entity::Column::ReportsUsedThisMonth, Expr::value(0))
            .col_expr(sub_entity::Column::LastResetDate, Expr::value(now))
            .col_expr(sub_entity::Column::UpdatedAt, Expr::value(now))
            .filter(sub_entity::Column::UserId.eq(user_id))
            .filter(sub_entity::Column::LastResetDate.lt(month_start))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
