// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::settings::LlmSettings;
use crate::domain::prompts::{build_chat_system_prompt, build_report_prompt};
use crate::domain::services::llm_service::{
    ChatTurn, LlmService, TokenUsage, CHAT_FALLBACK_REPLY,
};
use crate::infrastructure::metrics::{LLM_REQUESTS_TOTAL, LLM_REQUEST_DURATION_SECONDS};

/// OpenAI 兼容的 LLM 服务
///
/// 通过 `/chat/completions` 接口生成报告与对话回复，使用 Bearer 认证。
pub struct OpenAiLlmService {
    client: reqwest::Client,
    settings: LlmSettings,
}

impl OpenAiLlmService {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(Self { client, settings })
    }

    async fn complete(&self, kind: &'static str, body: Value) -> Result<Value> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("LLM API key not configured"))?;

        let url = format!(
            "{}/chat/completions",
            self.settings.api_base_url.trim_end_matches('/')
        );
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to LLM API")?;
        histogram!(LLM_REQUEST_DURATION_SECONDS, "kind" => kind)
            .record(started.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            counter!(LLM_REQUESTS_TOTAL, "kind" => kind, "outcome" => "error").increment(1);
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("LLM API returned error: {} - {}", status, error_text));
        }
        counter!(LLM_REQUESTS_TOTAL, "kind" => kind, "outcome" => "ok").increment(1);

        response
            .json()
            .await
            .context("Failed to parse LLM API response")
    }
}

/// 超出 u32 的计数按上限记
fn token_count(value: &Value) -> u32 {
    value
        .as_u64()
        .map_or(0, |count| u32::try_from(count).unwrap_or(u32::MAX))
}

fn token_usage(body: &Value) -> TokenUsage {
    match body.get("usage") {
        Some(usage) => TokenUsage {
            prompt_tokens: token_count(&usage["prompt_tokens"]),
            completion_tokens: token_count(&usage["completion_tokens"]),
            total_tokens: token_count(&usage["total_tokens"]),
        },
        None => TokenUsage::default(),
    }
}

fn message_content(body: &Value) -> Option<&str> {
    body["choices"][0]["message"]["content"].as_str()
}

/// 去掉模型偶尔包裹在 JSON 外的 markdown 代码块
fn strip_code_fences(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[async_trait]
impl LlmService for OpenAiLlmService {
    async fn generate_report(&self, payload: &Value) -> Result<(Value, TokenUsage)> {
        let request_body = json!({
            "model": self.settings.model,
            "messages": [
                { "role": "user", "content": build_report_prompt(payload) }
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": self.settings.report_max_tokens,
            "temperature": self.settings.report_temperature,
        });

        let body = self.complete("report", request_body).await?;
        let usage = token_usage(&body);
        let content = message_content(&body)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow!("No content received from LLM"))?;

        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "LLM report generated"
        );

        let report = serde_json::from_str::<Value>(strip_code_fences(content))
            .context("Failed to parse report JSON returned by LLM")?;
        Ok((report, usage))
    }

    async fn chat(&self, history: &[ChatTurn], report: Option<&Value>) -> Result<String> {
        let mut messages = vec![json!({
            "role": "system",
            "content": build_chat_system_prompt(report),
        })];
        messages.extend(
            history
                .iter()
                .map(|turn| json!({ "role": turn.role.to_string(), "content": turn.content })),
        );

        let request_body = json!({
            "model": self.settings.model,
            "messages": messages,
            "max_tokens": self.settings.chat_max_tokens,
            "temperature": self.settings.chat_temperature,
        });

        let body = self.complete("chat", request_body).await?;
        match message_content(&body).filter(|c| !c.trim().is_empty()) {
            Some(content) => Ok(content.to_string()),
            None => {
                warn!("LLM returned an empty chat completion");
                Ok(CHAT_FALLBACK_REPLY.to_string())
            }
        }
    }
}
