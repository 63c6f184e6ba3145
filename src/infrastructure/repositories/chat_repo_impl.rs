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

use crate::domain::models::chat::{ChatMessage, ChatRole, ChatSession};
use crate::domain::repositories::chat_repository::ChatRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{chat_message, chat_session};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 对话仓库实现
#[derive(Clone)]
pub struct ChatRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ChatRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<chat_session::Model> for ChatSession {
    fn from(model: chat_session::Model) -> Self {
        Self {
            id: model.id,
            job_id: model.job_id,
            user_id: model.user_id,
            title: model.title,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<ChatSession> for chat_session::ActiveModel {
    fn from(session: ChatSession) -> Self {
        Self {
            id: Set(session.id),
            job_id: Set(session.job_id),
            user_id: Set(session.user_id),
            title: Set(session.title),
            created_at: Set(session.created_at.into()),
            updated_at: Set(session.updated_at.into()),
        }
    }
}

impl TryFrom<chat_message::Model> for ChatMessage {
    type Error = RepositoryError;

    fn try_from(model: chat_message::Model) -> Result<Self, Self::Error> {
        let role: ChatRole = model
            .role
            .parse()
            .map_err(|_| RepositoryError::Corrupt(format!("unknown chat role '{}'", model.role)))?;
        Ok(Self {
            id: model.id,
            session_id: model.session_id,
            role,
            content: model.content,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

impl From<ChatMessage> for chat_message::ActiveModel {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: Set(message.id),
            session_id: Set(message.session_id),
            role: Set(message.role.to_string()),
            content: Set(message.content),
            created_at: Set(message.created_at.into()),
        }
    }
}

#[async_trait]
impl ChatRepository for ChatRepositoryImpl {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let model: chat_session::ActiveModel = session.clone().into();
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let model = chat_session::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_sessions_by_job(
        &self,
        job_id: Uuid,
        user_id: &str,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let models = chat_session::Entity::find()
            .filter(chat_session::Column::JobId.eq(job_id))
            .filter(chat_session::Column::UserId.eq(user_id))
            .order_by_desc(chat_session::Column::UpdatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn rename_session(&self, id: Uuid, title: &str) -> Result<ChatSession, RepositoryError> {
        let session = chat_session::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: chat_session::ActiveModel = session.into();
        active.title = Set(title.to_string());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn add_message(&self, message: &ChatMessage) -> Result<ChatMessage, RepositoryError> {
        let txn = self.db.begin().await?;

        let session = chat_session::Entity::find_by_id(message.session_id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let model: chat_message::ActiveModel = message.clone().into();
        let inserted = model.insert(&txn).await?;

        let mut active: chat_session::ActiveModel = session.into();
        active.updated_at = Set(message.created_at.into());
        active.update(&txn).await?;

        txn.commit().await?;
        inserted.try_into()
    }

    async fn find_message(&self, id: Uuid) -> Result<Option<ChatMessage>, RepositoryError> {
        chat_message::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn find_messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        chat_message::Entity::find()
            .filter(chat_message::Column::SessionId.eq(session_id))
            .order_by_asc(chat_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = chat_message::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
