// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 供应商受理抓取请求后的响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub snapshot_id: Option<String>,
}

/// 抓取服务特质
///
/// 触发异步 SERP 抓取，供应商完成后回调 `/api/webhook?jobId=`。
#[async_trait]
pub trait ScraperService: Send + Sync {
    async fn trigger(&self, job_id: Uuid, prompt: &str) -> Result<TriggerResponse>;
}
