// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::errors::DomainError;
use crate::domain::services::webhook_verifier::{SignatureHeaders, WebhookVerifier};

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";

/// Svix 签名验证
///
/// 签名内容为 `{id}.{timestamp}.{body}`，密钥为去掉 `whsec_` 前缀后
/// base64 解码的字节。签名头可包含多个以空格分隔的 `v1,<base64>` 条目，
/// 任意一个匹配即通过。
pub struct SvixVerifier {
    secret: Option<Vec<u8>>,
    tolerance_secs: i64,
}

impl SvixVerifier {
    pub fn new(secret: Option<&str>, tolerance_secs: i64) -> Result<Self, DomainError> {
        let secret = match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let encoded = raw.strip_prefix(SECRET_PREFIX).unwrap_or(raw);
                let decoded = STANDARD.decode(encoded).map_err(|e| {
                    DomainError::ValidationError(format!("webhook secret is not valid base64: {}", e))
                })?;
                Some(decoded)
            }
            None => None,
        };
        Ok(Self {
            secret,
            tolerance_secs,
        })
    }

    fn mac(&self, key: &[u8], headers: &SignatureHeaders, body: &[u8]) -> HmacSha256 {
        // HMAC 接受任意长度的密钥
        let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(headers.id.as_bytes());
        mac.update(b".");
        mac.update(headers.timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }

    /// 计算签名，用于测试与本地调试
    pub fn sign(&self, headers: &SignatureHeaders, body: &[u8]) -> Option<String> {
        let key = self.secret.as_ref()?;
        let tag = self.mac(key, headers, body).finalize().into_bytes();
        Some(format!("v1,{}", STANDARD.encode(tag)))
    }
}

impl WebhookVerifier for SvixVerifier {
    fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    fn verify(&self, headers: &SignatureHeaders, body: &[u8]) -> Result<(), DomainError> {
        let Some(key) = self.secret.as_ref() else {
            return Ok(());
        };

        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidSignature("malformed timestamp".to_string()))?;
        let within_tolerance = Utc::now()
            .timestamp()
            .checked_sub(timestamp)
            .map(i64::unsigned_abs)
            .is_some_and(|skew| skew <= self.tolerance_secs.unsigned_abs());
        if !within_tolerance {
            return Err(DomainError::InvalidSignature(
                "timestamp outside tolerance".to_string(),
            ));
        }

        let mac = self.mac(key, headers, body);
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|sig| mac.clone().verify_slice(&sig).is_ok());

        if matched {
            Ok(())
        } else {
            Err(DomainError::InvalidSignature(
                "no matching signature".to_string(),
            ))
        }
    }
}
