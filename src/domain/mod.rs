// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：抓取任务、对话与订阅实体
/// - 报告模式（report）：LLM 生成的 SEO 报告结构与校验
/// - 提示词（prompts）：发送给抓取供应商与 LLM 的固定提示
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：外部供应商的抽象接口
///
/// 领域层不依赖于任何外部实现。
pub mod errors;
pub mod models;
pub mod prompts;
pub mod report;
pub mod repositories;
pub mod services;
