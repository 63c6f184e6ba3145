// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::dto::subscription::SubscriptionSummary;
use crate::application::usecases::UseCaseError;
use crate::domain::errors::DomainError;
use crate::domain::models::subscription::{
    month_start, SubscriptionPlan, SubscriptionStatus, UserSubscription,
};
use crate::domain::repositories::subscription_repository::SubscriptionRepository;

/// 计费事件携带的订阅变更
#[derive(Debug, Clone)]
pub struct SubscriptionChange {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

/// 订阅用例
///
/// 读取订阅时会补建缺失的免费订阅，并在跨月时持久化用量重置。
pub struct SubscriptionUseCase {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionUseCase {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// 为新用户创建免费订阅；已存在时原样返回
    pub async fn initialize(&self, user_id: &str) -> Result<UserSubscription, UseCaseError> {
        if let Some(existing) = self.repo.find_by_user(user_id).await? {
            return Ok(existing);
        }

        let subscription = UserSubscription::new_free(user_id, Utc::now());
        match self.repo.create(&subscription).await {
            Ok(created) => {
                info!(user_id, "Initialized free subscription");
                Ok(created)
            }
            // 并发初始化时唯一索引冲突，以已写入的记录为准
            Err(e) => match self.repo.find_by_user(user_id).await? {
                Some(existing) => Ok(existing),
                None => Err(e.into()),
            },
        }
    }

    /// 当前订阅，必要时初始化并执行月度重置
    pub async fn get_subscription(&self, user_id: &str) -> Result<UserSubscription, UseCaseError> {
        let subscription = self.initialize(user_id).await?;
        let now = Utc::now();
        if !subscription.needs_monthly_reset(now) {
            return Ok(subscription);
        }
        if self.repo.reset_usage(user_id, month_start(now), now).await? {
            info!(user_id, "Monthly report usage reset");
        }
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Subscription not found"))
    }

    pub async fn summary(&self, user_id: &str) -> Result<SubscriptionSummary, UseCaseError> {
        let subscription = self.get_subscription(user_id).await?;
        Ok(SubscriptionSummary::from(&subscription))
    }

    /// 占用一次报告额度
    ///
    /// 额度检查与计数在同一条条件更新中完成，额度用尽时返回 `QuotaExceeded`。
    pub async fn record_report(&self, user_id: &str) -> Result<(), UseCaseError> {
        let subscription = self.get_subscription(user_id).await?;
        let plan = subscription.effective_plan();
        let limit = plan.features().reports_per_month;
        if self.repo.try_increment_usage(user_id, limit).await? {
            return Ok(());
        }

        let used = self
            .repo
            .find_by_user(user_id)
            .await?
            .map_or(subscription.reports_used_this_month, |s| s.reports_used_this_month);
        Err(DomainError::QuotaExceeded {
            plan: plan.to_string(),
            used,
            limit: limit.unwrap_or(0),
        }
        .into())
    }

    /// 归还未能发起的报告占用的额度
    pub async fn release_report(&self, user_id: &str) -> Result<(), UseCaseError> {
        self.repo.decrement_usage(user_id).await?;
        Ok(())
    }

    pub async fn ensure_can_use_chat(&self, user_id: &str) -> Result<(), UseCaseError> {
        let subscription = self.get_subscription(user_id).await?;
        if !subscription.can_use_ai_chat() {
            return Err(DomainError::FeatureNotAvailable(
                "AI chat".to_string(),
                subscription.effective_plan().to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// 写入计费供应商的订阅状态；用量计数保持不变
    pub async fn create_or_update(
        &self,
        user_id: &str,
        change: SubscriptionChange,
    ) -> Result<UserSubscription, UseCaseError> {
        let now = Utc::now();
        match self.repo.find_by_user(user_id).await? {
            Some(mut existing) => {
                existing.plan = change.plan;
                existing.status = change.status;
                existing.current_period_start = change.current_period_start;
                existing.current_period_end = change.current_period_end;
                existing.updated_at = now;
                Ok(self.repo.update(&existing).await?)
            }
            None => {
                let subscription = UserSubscription {
                    id: Uuid::new_v4(),
                    user_id: user_id.to_string(),
                    plan: change.plan,
                    status: change.status,
                    current_period_start: change.current_period_start,
                    current_period_end: change.current_period_end,
                    reports_used_this_month: 0,
                    last_reset_date: now,
                    created_at: now,
                    updated_at: now,
                };
                Ok(self.repo.create(&subscription).await?)
            }
        }
    }

    /// 取消订阅；用户没有订阅记录时返回 None
    pub async fn cancel(&self, user_id: &str) -> Result<Option<UserSubscription>, UseCaseError> {
        let Some(mut subscription) = self.repo.find_by_user(user_id).await? else {
            warn!(user_id, "Cancel requested for user without subscription");
            return Ok(None);
        };
        subscription.status = SubscriptionStatus::Canceled;
        subscription.updated_at = Utc::now();
        Ok(Some(self.repo.update(&subscription).await?))
    }
}
