// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// - 发起报告（start_report）：额度检查、创建任务并触发抓取
/// - 抓取回调（process_scraper_webhook）：生成并保存 SEO 报告
/// - 对话（chat）：报告范围内的 AI 助手
/// - 订阅（subscriptions）：套餐、额度与月度重置
/// - 计费回调（billing_webhook）：验签与事件分发
pub mod billing_webhook;
pub mod chat;
pub mod process_scraper_webhook;
pub mod start_report;
pub mod subscriptions;


use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::repositories::RepositoryError;

/// 用例错误类型
#[derive(Error, Debug)]
pub enum UseCaseError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Upstream service error: {0}")]
    Service(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn validation(message: impl Into<String>) -> Self {
        UseCaseError::Domain(DomainError::ValidationError(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        UseCaseError::Domain(DomainError::NotFound(message.into()))
    }
}
