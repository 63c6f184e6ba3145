// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层的数据持久化契约，具体实现由基础设施层提供：
/// - 抓取任务仓库（scraping_job_repository）
/// - 对话仓库（chat_repository）：会话与消息
/// - 订阅仓库（subscription_repository）
pub mod chat_repository;
pub mod scraping_job_repository;
pub mod subscription_repository;

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储中的值无法映射为领域类型
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
