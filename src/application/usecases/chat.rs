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

use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::chat::{
    ChatMessageResponse, ChatRequest, ChatResponse, ChatSessionResponse, RenameSessionRequest,
};
use crate::application::usecases::subscriptions::SubscriptionUseCase;
use crate::application::usecases::UseCaseError;
use crate::domain::errors::DomainError;
use crate::domain::models::chat::{ChatMessage, ChatRole, ChatSession};
use crate::domain::repositories::chat_repository::ChatRepository;
use crate::domain::repositories::scraping_job_repository::ScrapingJobRepository;
use crate::domain::services::llm_service::{ChatTurn, LlmService};
use crate::infrastructure::metrics::CHAT_MESSAGES_TOTAL;

/// 报告范围内的对话用例
pub struct ChatUseCase {
    chats: Arc<dyn ChatRepository>,
    jobs: Arc<dyn ScrapingJobRepository>,
    llm: Arc<dyn LlmService>,
    subscriptions: Arc<SubscriptionUseCase>,
}

impl ChatUseCase {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        jobs: Arc<dyn ScrapingJobRepository>,
        llm: Arc<dyn LlmService>,
        subscriptions: Arc<SubscriptionUseCase>,
    ) -> Self {
        Self {
            chats,
            jobs,
            llm,
            subscriptions,
        }
    }

    /// 发送一条消息并返回助手回复
    ///
    /// 没有 `session_id` 时按 `job_id` 惰性创建会话，标题取自这条消息。
    pub async fn send_message(
        &self,
        user_id: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, UseCaseError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(UseCaseError::validation("Message is required"));
        }

        self.subscriptions.ensure_can_use_chat(user_id).await?;

        let session = match (request.session_id, request.job_id) {
            (Some(session_id), _) => self.owned_session(user_id, session_id).await?,
            (None, Some(job_id)) => {
                self.owned_job_exists(user_id, job_id).await?;
                let session = self
                    .chats
                    .create_session(&ChatSession::new(job_id, user_id, message))
                    .await?;
                info!(session_id = %session.id, %job_id, "Chat session created");
                session
            }
            (None, None) => {
                return Err(UseCaseError::validation(
                    "Session ID or Job ID is required",
                ))
            }
        };

        self.chats
            .add_message(&ChatMessage::new(session.id, ChatRole::User, message))
            .await?;

        let report = self
            .jobs
            .find_by_id(session.job_id)
            .await?
            .and_then(|job| job.seo_report);

        let history: Vec<ChatTurn> = self
            .chats
            .find_messages(session.id)
            .await?
            .into_iter()
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content,
            })
            .collect();
        debug!(session_id = %session.id, turns = history.len(), "Sending chat history to LLM");

        let reply = self.llm.chat(&history, report.as_ref()).await?;

        self.chats
            .add_message(&ChatMessage::new(session.id, ChatRole::Assistant, &reply))
            .await?;
        counter!(CHAT_MESSAGES_TOTAL).increment(1);

        Ok(ChatResponse {
            response: reply,
            session_id: session.id,
        })
    }

    /// 任务下当前用户的会话，最近更新的在前
    pub async fn list_sessions(
        &self,
        user_id: &str,
        job_id: Uuid,
    ) -> Result<Vec<ChatSessionResponse>, UseCaseError> {
        self.owned_job_exists(user_id, job_id).await?;
        let sessions = self.chats.find_sessions_by_job(job_id, user_id).await?;
        Ok(sessions.into_iter().map(Into::into).collect())
    }

    pub async fn get_messages(
        &self,
        user_id: &str,
        session_id: Uuid,
    ) -> Result<Vec<ChatMessageResponse>, UseCaseError> {
        self.owned_session(user_id, session_id).await?;
        let messages = self.chats.find_messages(session_id).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    pub async fn rename_session(
        &self,
        user_id: &str,
        session_id: Uuid,
        request: RenameSessionRequest,
    ) -> Result<ChatSessionResponse, UseCaseError> {
        let title = request.title.trim().to_string();
        RenameSessionRequest {
            title: title.clone(),
        }
        .validate()
        .map_err(|e| UseCaseError::validation(e.to_string()))?;

        self.owned_session(user_id, session_id).await?;
        let session = self.chats.rename_session(session_id, &title).await?;
        Ok(session.into())
    }

    pub async fn delete_message(
        &self,
        user_id: &str,
        message_id: Uuid,
    ) -> Result<(), UseCaseError> {
        let message = self
            .chats
            .find_message(message_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Message not found"))?;
        self.owned_session(user_id, message.session_id).await?;
        self.chats.delete_message(message_id).await?;
        Ok(())
    }

    async fn owned_session(
        &self,
        user_id: &str,
        session_id: Uuid,
    ) -> Result<ChatSession, UseCaseError> {
        let session = self
            .chats
            .find_session(session_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Chat session not found"))?;
        if !session.is_owned_by(user_id) {
            return Err(DomainError::Forbidden.into());
        }
        Ok(session)
    }

    async fn owned_job_exists(&self, user_id: &str, job_id: Uuid) -> Result<(), UseCaseError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Job not found"))?;
        if !job.is_owned_by(user_id) {
            return Err(DomainError::Forbidden.into());
        }
        Ok(())
    }
}
