// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::subscription::{
    PlanFeatures, SubscriptionPlan, SubscriptionStatus, UserSubscription,
};

/// 套餐概要
///
/// `plan` 为生效套餐；非 active 状态下即使存储的是付费套餐也显示 free。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub features: PlanFeatures,
    pub reports_used: u32,
    /// 剩余报告数，null 表示不限
    pub remaining: Option<u32>,
    pub current_period_end: DateTime<Utc>,
}

impl From<&UserSubscription> for SubscriptionSummary {
    fn from(sub: &UserSubscription) -> Self {
        Self {
            plan: sub.effective_plan(),
            status: sub.status,
            features: sub.features(),
            reports_used: sub.reports_used_this_month,
            remaining: sub.remaining_reports(),
            current_period_end: sub.current_period_end,
        }
    }
}
