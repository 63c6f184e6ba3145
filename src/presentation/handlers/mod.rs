// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器负责解析请求、调用对应用例并返回 JSON 响应
pub mod billing_webhook_handler;
pub mod chat_handler;
pub mod job_handler;
pub mod scraper_webhook_handler;
pub mod subscription_handler;
