use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::shared::models::{
    page_bounds, Agent, AppState, CreateSessionRequest, Session, SessionWithPrompt, UpdateSessionRequest,
};

pub struct SessionService<'a> {
    db: &'a SqlitePool,
}

impl<'a> SessionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { db: &state.db }
    }

    pub async fn create(&self, req: CreateSessionRequest) -> AppResult<Session> {
        if Agent::find_by_id(self.db, req.agent_id).await?.is_none() {
            return Err(AppError::not_found("Agent", req.agent_id));
        }

        let session = Session::create(self.db, req).await?;
        info!("Created session {} for agent {}", session.id, session.agent_id);
        Ok(session)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Session> {
        Session::find_by_id(self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Session", id))
    }

    /// Session plus the system prompt of its agent.
    pub async fn get_with_prompt(&self, id: Uuid) -> AppResult<SessionWithPrompt> {
        Session::find_with_prompt(self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Session", id))
    }

    pub async fn list(&self, skip: Option<i64>, limit: Option<i64>) -> AppResult<Vec<Session>> {
        let (skip, limit) = page_bounds(skip, limit);
        Ok(Session::find_all(self.db, skip, limit).await?)
    }

    /// An empty update is a no-op returning the current session.
    pub async fn update(&self, id: Uuid, req: UpdateSessionRequest) -> AppResult<Session> {
        let current = self.get(id).await?;
        if req.is_empty() {
            return Ok(current);
        }

        if let Some(agent_id) = req.agent_id {
            if Agent::find_by_id(self.db, agent_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Agent with id {agent_id} does not exist")));
            }
        }

        let session = Session::update(self.db, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Session", id))?;
        info!("Updated session {}", session.id);
        Ok(session)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !Session::delete(self.db, id).await? {
            return Err(AppError::not_found("Session", id));
        }
        info!("Deleted session {} and its messages", id);
        Ok(())
    }
}
