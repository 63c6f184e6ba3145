// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排领域对象、仓库与外部供应商完成具体用例，
/// 表示层只与这里的用例和 DTO 打交道。
pub mod dto;
pub mod usecases;
