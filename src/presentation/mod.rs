// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层：HTTP 路由、处理器、提取器与错误映射
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod routes;
