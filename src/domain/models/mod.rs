// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 对话模型
pub mod chat;
/// 抓取任务模型
pub mod scraping_job;
/// 订阅模型
pub mod subscription;
