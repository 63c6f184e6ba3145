// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 发起报告、处理回调、对话与订阅等用例
pub mod application;

/// 配置模块
///
/// 默认值、配置文件与环境变量的分层加载
pub mod config;

/// 领域模块
///
/// 核心业务实体、报告模式、提示词以及仓库和服务接口
pub mod domain;

/// 基础设施模块
///
/// 数据库、供应商适配器与指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和提取器
pub mod presentation;

/// 工具模块
pub mod utils;
