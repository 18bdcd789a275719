use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;
use utoipa::ToSchema;

use super::StoreError;

pub const DEFAULT_SESSION_TITLE: &str = "New Chat Session";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session joined with its agent's system prompt.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithPrompt {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub title: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub agent_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub agent_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.agent_id.is_none() && self.title.is_none()
    }
}

impl Session {
    pub async fn find_all(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Session>, StoreError> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, agent_id, title, created_at, updated_at
            FROM sessions
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            "#
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, agent_id, title, created_at, updated_at
            FROM sessions
            WHERE id = ?1
            "#
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn find_with_prompt(pool: &SqlitePool, id: Uuid) -> Result<Option<SessionWithPrompt>, StoreError> {
        let session = sqlx::query_as::<_, SessionWithPrompt>(
            r#"
            SELECT s.id, s.agent_id, s.title, a.prompt
            FROM sessions s
            INNER JOIN agents a ON a.id = s.agent_id
            WHERE s.id = ?1
            "#
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn create(pool: &SqlitePool, req: CreateSessionRequest) -> Result<Session, StoreError> {
        let now = Utc::now();
        let title = req.title.unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, agent_id, title, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, agent_id, title, created_at, updated_at
            "#
        )
        .bind(Uuid::now_v7())
        .bind(req.agent_id)
        .bind(title)
        .bind(now)
        .fetch_one(pool)
        .await?;

        tracing::debug!("Created session {} for agent {}", session.id, session.agent_id);
        Ok(session)
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, req: UpdateSessionRequest) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET agent_id = COALESCE(?2, agent_id),
                title = COALESCE(?3, title),
                updated_at = ?4
            WHERE id = ?1
            RETURNING id, agent_id, title, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(req.agent_id)
        .bind(req.title)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
