// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，依赖于领域层的抽象接口。
///
/// 包含的子模块：
/// - 数据库（database）：连接池、迁移与实体映射
/// - 指标（metrics）：Prometheus 导出器与指标名称
/// - 仓库实现（repositories）：领域仓库接口的 SeaORM 实现
/// - 服务（services）：抓取供应商、LLM 与签名验证的适配器
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod services;
