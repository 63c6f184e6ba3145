// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 计费供应商推送的事件
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

/// `subscription.*` 事件的数据部分
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionEventData {
    pub user_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Unix 秒
    #[serde(default)]
    pub current_period_start: Option<i64>,
    /// Unix 秒
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

/// `user.created` 事件的数据部分
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEventData {
    pub id: String,
}
