// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::chat::{ChatMessage, ChatSession};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 对话仓库特质
///
/// 会话与消息共用一个仓库；删除会话时消息由外键级联删除。
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError>;
    async fn find_session(&self, id: Uuid) -> Result<Option<ChatSession>, RepositoryError>;
    /// 任务下的会话，按最近更新倒序
    async fn find_sessions_by_job(
        &self,
        job_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<ChatSession>, RepositoryError>;
    async fn rename_session(&self, id: Uuid, title: &str) -> Result<ChatSession, RepositoryError>;

    /// 追加消息并刷新会话的 updated_at
    async fn add_message(&self, message: &ChatMessage) -> Result<ChatMessage, RepositoryError>;
    async fn find_message(&self, id: Uuid) -> Result<Option<ChatMessage>, RepositoryError>;
    /// 会话内的消息，按创建时间正序
    async fn find_messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, RepositoryError>;
    async fn delete_message(&self, id: Uuid) -> Result<(), RepositoryError>;
}
