// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::DomainError;

/// 签名相关的请求头
#[derive(Debug, Clone)]
pub struct SignatureHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

/// Webhook 签名验证特质
pub trait WebhookVerifier: Send + Sync {
    /// 是否配置了签名密钥；未配置时跳过验证
    fn is_enabled(&self) -> bool;

    fn verify(&self, headers: &SignatureHeaders, body: &[u8]) -> Result<(), DomainError>;
}
