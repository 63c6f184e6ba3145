// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::dto::subscription::SubscriptionSummary;
use crate::application::usecases::subscriptions::SubscriptionUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::user_id::UserId;

/// 当前用户的套餐概要
pub async fn get_subscription(
    user: UserId,
    Extension(use_case): Extension<Arc<SubscriptionUseCase>>,
) -> Result<Json<SubscriptionSummary>, AppError> {
    Ok(Json(use_case.summary(user.as_str()).await?))
}
