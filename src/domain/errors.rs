// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 领域错误类型
///
/// 表示在领域层可能发生的各种错误情况，表示层据此映射 HTTP 状态码。
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当任务状态转换不符合业务规则时发生
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("{0}")]
    ValidationError(String),

    /// 资源不存在
    #[error("{0}")]
    NotFound(String),

    /// 资源不属于当前用户
    #[error("Access denied")]
    Forbidden,

    /// 当前套餐未开放该功能
    #[error("{0} is not available on the {1} plan")]
    FeatureNotAvailable(String, String),

    /// 本月报告额度已用完
    #[error("Monthly report quota exhausted ({used}/{limit} on the {plan} plan)")]
    QuotaExceeded { plan: String, used: u32, limit: u32 },

    /// Webhook 签名验证失败
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),
}
