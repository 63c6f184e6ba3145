// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::chat::{
    ChatMessageResponse, ChatRequest, ChatResponse, ChatSessionResponse, RenameSessionRequest,
};
use crate::application::usecases::chat::ChatUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::user_id::UserId;

pub async fn send_message(
    user: UserId,
    Extension(use_case): Extension<Arc<ChatUseCase>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    Ok(Json(use_case.send_message(user.as_str(), payload).await?))
}

pub async fn list_sessions(
    user: UserId,
    Extension(use_case): Extension<Arc<ChatUseCase>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ChatSessionResponse>>, AppError> {
    Ok(Json(use_case.list_sessions(user.as_str(), job_id).await?))
}

pub async fn get_messages(
    user: UserId,
    Extension(use_case): Extension<Arc<ChatUseCase>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessageResponse>>, AppError> {
    Ok(Json(use_case.get_messages(user.as_str(), session_id).await?))
}

pub async fn rename_session(
    user: UserId,
    Extension(use_case): Extension<Arc<ChatUseCase>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<RenameSessionRequest>,
) -> Result<Json<ChatSessionResponse>, AppError> {
    Ok(Json(
        use_case
            .rename_session(user.as_str(), session_id, payload)
            .await?,
    ))
}

pub async fn delete_message(
    user: UserId,
    Extension(use_case): Extension<Arc<ChatUseCase>>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    use_case.delete_message(user.as_str(), message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
