// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::settings::ScraperSettings;
use crate::domain::services::scraper_service::{ScraperService, TriggerResponse};

/// 回调字段，供应商按此列表裁剪输出
const OUTPUT_FIELDS: [&str; 7] = [
    "url",
    "prompt",
    "answer_text",
    "sources",
    "citations",
    "timestamp",
    "input",
];

/// Bright Data 数据集触发器
///
/// 抓取完成后供应商把结果 POST 到 `{callback_base_url}/api/webhook?jobId=`。
pub struct BrightDataScraper {
    client: reqwest::Client,
    settings: ScraperSettings,
}

impl BrightDataScraper {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build scraper HTTP client")?;
        Ok(Self { client, settings })
    }

    /// 供应商回调本服务的地址，保留基础地址中的路径前缀
    pub fn callback_url(&self, job_id: Uuid) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/api/webhook",
            self.settings.callback_base_url.trim_end_matches('/')
        ))
        .context("Invalid scraper callback base URL")?;
        url.query_pairs_mut()
            .append_pair("jobId", &job_id.to_string());
        Ok(url)
    }

    fn trigger_url(&self, job_id: Uuid) -> Result<Url> {
        let endpoint = self.callback_url(job_id)?;
        let mut url = Url::parse(&format!(
            "{}/datasets/v3/trigger",
            self.settings.api_base_url.trim_end_matches('/')
        ))
        .context("Invalid scraper API base URL")?;
        url.query_pairs_mut()
            .append_pair("dataset_id", &self.settings.dataset_id)
            .append_pair("endpoint", endpoint.as_str())
            .append_pair("format", "json")
            .append_pair("uncompressed_webhook", "true")
            .append_pair("include_errors", "true");
        Ok(url)
    }
}

#[async_trait]
impl ScraperService for BrightDataScraper {
    async fn trigger(&self, job_id: Uuid, prompt: &str) -> Result<TriggerResponse> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("scraper API key not configured"))?;

        let body = json!({
            "input": [{
                "url": self.settings.target_url,
                "prompt": prompt,
                "country": self.settings.country,
                "index": 1,
            }],
            "custom_output_fields": OUTPUT_FIELDS,
        });

        let url = self.trigger_url(job_id)?;
        debug!(%job_id, "Triggering scraper dataset");

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send trigger request to scraper")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(if text.is_empty() {
                anyhow!("HTTP {}", status)
            } else {
                anyhow!("HTTP {}: {}", status, text)
            });
        }

        // 响应体不是 JSON 时仍视为已受理，只是没有快照 ID
        let data: Option<Value> = response.json().await.ok();
        let snapshot_id = data
            .as_ref()
            .and_then(|d| d.get("snapshot_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        info!(%job_id, snapshot_id = ?snapshot_id, "Scraper accepted trigger");
        Ok(TriggerResponse { snapshot_id })
    }
}
