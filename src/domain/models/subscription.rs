// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// `now` 所在自然月（UTC）第一天的零点
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|start| Utc.from_utc_datetime(&start))
        .unwrap_or(now)
}

/// 订阅套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Starter,
    Pro,
}

impl SubscriptionPlan {
    /// 套餐对应的功能限制
    pub fn features(&self) -> PlanFeatures {
        match self {
            SubscriptionPlan::Free => PlanFeatures {
                reports_per_month: Some(0),
                ai_chat_enabled: false,
            },
            SubscriptionPlan::Starter => PlanFeatures {
                reports_per_month: Some(10),
                ai_chat_enabled: false,
            },
            SubscriptionPlan::Pro => PlanFeatures {
                reports_per_month: None,
                ai_chat_enabled: true,
            },
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionPlan::Free => write!(f, "free"),
            SubscriptionPlan::Starter => write!(f, "starter"),
            SubscriptionPlan::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionPlan::Free),
            "starter" => Ok(SubscriptionPlan::Starter),
            "pro" => Ok(SubscriptionPlan::Pro),
            _ => Err(()),
        }
    }
}

/// 订阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Canceled,
    PastDue,
}

impl SubscriptionStatus {
    /// 计费供应商的状态字符串；除 active 与 past_due 外均视为已取消
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            _ => SubscriptionStatus::Canceled,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Canceled => write!(f, "canceled"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            _ => Err(()),
        }
    }
}

/// 套餐功能
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFeatures {
    /// 每月报告额度，None 表示不限
    pub reports_per_month: Option<u32>,
    pub ai_chat_enabled: bool,
}

/// 用户订阅记录，每个用户至多一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: Uuid,
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub reports_used_this_month: u32,
    pub last_reset_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSubscription {
    /// 新用户的免费订阅，周期为 30 天
    pub fn new_free(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            plan: SubscriptionPlan::Free,
            status: SubscriptionStatus::Active,
            current_period_start: now,
            current_period_end: now + Duration::days(30),
            reports_used_this_month: 0,
            last_reset_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// 生效套餐：仅在状态为 active 时使用存储的套餐，否则降级为 free
    pub fn effective_plan(&self) -> SubscriptionPlan {
        if self.status == SubscriptionStatus::Active {
            self.plan
        } else {
            SubscriptionPlan::Free
        }
    }

    pub fn features(&self) -> PlanFeatures {
        self.effective_plan().features()
    }

    pub fn can_generate_report(&self) -> bool {
        match self.features().reports_per_month {
            None => true,
            Some(limit) => self.reports_used_this_month < limit,
        }
    }

    /// 剩余报告数，None 表示不限
    pub fn remaining_reports(&self) -> Option<u32> {
        self.features()
            .reports_per_month
            .map(|limit| limit.saturating_sub(self.reports_used_this_month))
    }

    pub fn can_use_ai_chat(&self) -> bool {
        self.features().ai_chat_enabled
    }

    /// 上次重置是否早于 `now` 所在的自然月（UTC）
    pub fn needs_monthly_reset(&self, now: DateTime<Utc>) -> bool {
        (self.last_reset_date.year(), self.last_reset_date.month()) < (now.year(), now.month())
    }

    /// 跨月时清零用量，返回是否发生了重置
    pub fn apply_monthly_reset(&mut self, now: DateTime<Utc>) -> bool {
        if !self.needs_monthly_reset(now) {
            return false;
        }
        self.reports_used_this_month = 0;
        self.last_reset_date = now;
        self.updated_at = now;
        true
    }

    pub fn record_report(&mut self, now: DateTime<Utc>) {
        self.reports_used_this_month = self.reports_used_this_month.saturating_add(1);
        self.updated_at = now;
    }
}
