use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use uuid::Uuid;
use utoipa::ToSchema;

use super::StoreError;

/// Longest text message accepted from a user, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Voice,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload used by the orchestration layer.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub message_type: MessageType,
    pub audio_url: Option<String>,
}

impl NewMessage {
    pub fn text(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            session_id,
            role,
            content: content.into(),
            message_type: MessageType::Text,
            audio_url: None,
        }
    }

    pub fn with_audio(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }

    pub fn voice(mut self) -> Self {
        self.message_type = MessageType::Voice;
        self
    }
}

/// A `{role, content}` pair handed to the LLM as prior context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TextMessageRequest {
    pub session_id: Uuid,
    pub content: String,
}

// Database operations
impl Message {
    pub async fn create(pool: &SqlitePool, new: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, session_id, role, content, message_type, audio_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING id, session_id, role, content, message_type, audio_url, created_at, updated_at
            "#
        )
        .bind(Uuid::now_v7())
        .bind(new.session_id)
        .bind(new.role)
        .bind(new.content)
        .bind(new.message_type)
        .bind(new.audio_url)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Messages of a session in conversation order.
    pub async fn find_by_session(
        pool: &SqlitePool,
        session_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Message>, StoreError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, session_id, role, content, message_type, audio_url, created_at, updated_at
            FROM messages
            WHERE session_id = ?1
            ORDER BY created_at ASC, id ASC
            LIMIT ?2 OFFSET ?3
            "#
        )
        .bind(session_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// The last `limit` turns of a session, oldest first.
    pub async fn recent_history(pool: &SqlitePool, session_id: Uuid, limit: i64) -> Result<Vec<ChatTurn>, StoreError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let mut turns = sqlx::query_as::<_, ChatTurn>(
            r#"
            SELECT role, content
            FROM messages
            WHERE session_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        turns.reverse();
        Ok(turns)
    }
}
