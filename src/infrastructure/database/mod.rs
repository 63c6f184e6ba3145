// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 连接池与启动迁移，以及报告任务、对话和订阅三组表的实体
pub mod connection;
pub mod entities;
