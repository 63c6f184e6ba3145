// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于SeaORM的领域仓库接口实现
pub mod chat_repo_impl;
pub mod scraping_job_repo_impl;
pub mod subscription_repo_impl;
