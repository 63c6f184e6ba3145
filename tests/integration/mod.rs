// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod billing_webhook_test;
pub mod chat_test;
pub mod health_check;
pub mod job_flow_test;
pub mod subscription_test;
pub mod webhook_test;
