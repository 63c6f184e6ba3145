// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求与响应的数据结构
pub mod billing_event;
pub mod chat;
pub mod job;
pub mod subscription;
