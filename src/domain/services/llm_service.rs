// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::chat::ChatRole;

/// 对话模型没有生成内容时返回的文本
pub const CHAT_FALLBACK_REPLY: &str =
    "I apologize, but I was unable to generate a response. Please try again.";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 对话历史中的一轮
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// LLM服务特质
///
/// # 功能
///
/// - `generate_report`：以固定分析提示将抓取结果转换为 JSON 报告
/// - `chat`：在系统提示与历史消息基础上生成助手回复
#[async_trait]
pub trait LlmService: Send + Sync {
    /// 生成报告 JSON，尚未经过模式校验
    async fn generate_report(&self, payload: &Value) -> Result<(Value, TokenUsage)>;

    /// 生成对话回复，`report` 为当前会话所属任务的报告
    async fn chat(&self, history: &[ChatTurn], report: Option<&Value>) -> Result<String>;
}
