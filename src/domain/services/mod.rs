// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 外部供应商的抽象接口，具体实现位于基础设施层：
/// - LLM服务（llm_service）：报告生成与对话
/// - 抓取服务（scraper_service）：触发 SERP 抓取
/// - Webhook验证（webhook_verifier）：计费回调签名校验
pub mod llm_service;
pub mod scraper_service;
pub mod webhook_verifier;
