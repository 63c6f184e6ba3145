// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 抓取供应商回调中的单条记录
///
/// 供应商可能附带额外字段（citations、input 等），反序列化时忽略。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingData {
    pub url: String,
    pub prompt: String,
    pub answer_text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub description: String,
}

impl ScrapingData {
    /// 从回调负载中提取能识别的记录，跳过错误条目
    pub fn collect(results: &Value) -> Vec<ScrapingData> {
        match results {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            other => serde_json::from_value(other.clone()).into_iter().collect(),
        }
    }
}
