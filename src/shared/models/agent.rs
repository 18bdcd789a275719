use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;
use utoipa::ToSchema;

use super::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    /// System prompt defining the persona.
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAgentRequest {
    pub name: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAgentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl UpdateAgentRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.prompt.is_none()
    }
}

// Database queries
impl Agent {
    pub async fn find_all(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Agent>, StoreError> {
        let agents = sqlx::query_as::<_, Agent>(
            r#"
            SELECT id, name, prompt, created_at, updated_at
            FROM agents
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            "#
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

        Ok(agents)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Agent>, StoreError> {
        let agent = sqlx::query_as::<_, Agent>(
            r#"
            SELECT id, name, prompt, created_at, updated_at
            FROM agents
            WHERE id = ?1
            "#
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(agent)
    }

    pub async fn create(pool: &SqlitePool, req: CreateAgentRequest) -> Result<Agent, StoreError> {
        let now = Utc::now();
        let agent = sqlx::query_as::<_, Agent>(
            r#"
            INSERT INTO agents (id, name, prompt, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, name, prompt, created_at, updated_at
            "#
        )
        .bind(Uuid::now_v7())
        .bind(req.name)
        .bind(req.prompt)
        .bind(now)
        .fetch_one(pool)
        .await?;

        tracing::debug!("Created agent {}", agent.id);
        Ok(agent)
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, req: UpdateAgentRequest) -> Result<Option<Agent>, StoreError> {
        let agent = sqlx::query_as::<_, Agent>(
            r#"
            UPDATE agents
            SET name = COALESCE(?2, name),
                prompt = COALESCE(?3, prompt),
                updated_at = ?4
            WHERE id = ?1
            RETURNING id, name, prompt, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(req.name)
        .bind(req.prompt)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(agent)
    }

    /// Physical delete; sessions and their messages go with it.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
