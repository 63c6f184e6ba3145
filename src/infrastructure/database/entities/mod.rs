// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 使用SeaORM映射的表结构，状态与套餐以字符串列存储。
pub mod chat_message;
pub mod chat_session;
pub mod scraping_job;
pub mod user_subscription;
