use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::shared::models::{page_bounds, Agent, AppState, CreateAgentRequest, UpdateAgentRequest};

pub const MAX_AGENT_NAME_CHARS: usize = 100;

pub struct AgentService<'a> {
    db: &'a SqlitePool,
    config: &'a Config,
}

impl<'a> AgentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { db: &state.db, config: &state.config }
    }

    pub async fn create(&self, req: CreateAgentRequest) -> AppResult<Agent> {
        validate_name(&req.name)?;
        self.validate_prompt(&req.prompt)?;

        let agent = Agent::create(self.db, req).await?;
        info!("Created agent {} ({})", agent.id, agent.name);
        Ok(agent)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Agent> {
        Agent::find_by_id(self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Agent", id))
    }

    pub async fn list(&self, skip: Option<i64>, limit: Option<i64>) -> AppResult<Vec<Agent>> {
        let (skip, limit) = page_bounds(skip, limit);
        Ok(Agent::find_all(self.db, skip, limit).await?)
    }

    pub async fn update(&self, id: Uuid, req: UpdateAgentRequest) -> AppResult<Agent> {
        if req.is_empty() {
            return Err(AppError::Validation("No fields provided for update".to_string()));
        }
        if let Some(name) = &req.name {
            validate_name(name)?;
        }
        if let Some(prompt) = &req.prompt {
            self.validate_prompt(prompt)?;
        }

        let agent = Agent::update(self.db, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Agent", id))?;
        info!("Updated agent {}", agent.id);
        Ok(agent)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !Agent::delete(self.db, id).await? {
            return Err(AppError::not_found("Agent", id));
        }
        info!("Deleted agent {} and its sessions", id);
        Ok(())
    }

    fn validate_prompt(&self, prompt: &str) -> AppResult<()> {
        if self.config.require_agent_prompt && prompt.trim().is_empty() {
            return Err(AppError::Validation("Agent prompt cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Agent name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_AGENT_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "Agent name cannot exceed {MAX_AGENT_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_name;

    #[test]
    fn name_rules() {
        assert!(validate_name("Tutor").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(100)).is_ok());
        assert!(validate_name(&"a".repeat(101)).is_err());
    }
}
