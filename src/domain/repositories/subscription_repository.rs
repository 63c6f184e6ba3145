// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::subscription::UserSubscription;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 订阅仓库特质
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str)
        -> Result<Option<UserSubscription>, RepositoryError>;
    async fn create(&self, subscription: &UserSubscription)
        -> Result<UserSubscription, RepositoryError>;
    /// 写入套餐、状态与计费周期；用量列只通过下面的原子操作修改
    async fn update(&self, subscription: &UserSubscription)
        -> Result<UserSubscription, RepositoryError>;
    /// 用量低于 `limit` 时原子地加一，返回是否计入
    ///
    /// `limit` 为 None 表示不限。
    async fn try_increment_usage(&self, user_id: &str, limit: Option<u32>)
        -> Result<bool, RepositoryError>;
    /// 归还一次用量，不会低于零
    async fn decrement_usage(&self, user_id: &str) -> Result<(), RepositoryError>;
    /// 上次重置早于 `month_start` 时清零用量，返回是否发生了重置
    async fn reset_usage(
        &self,
        user_id: &str,
        month_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}
