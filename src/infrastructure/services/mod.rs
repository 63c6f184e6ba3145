// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部供应商适配器
pub mod bright_data_scraper;
pub mod openai_llm_service;
pub mod svix_verifier;
