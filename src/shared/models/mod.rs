use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::storage::AudioStorage;

pub mod agent;
pub mod session;
pub mod message;
pub mod voice_job;

pub use agent::{Agent, CreateAgentRequest, UpdateAgentRequest};
pub use session::{Session, SessionWithPrompt, CreateSessionRequest, UpdateSessionRequest};
pub use message::{Message, MessageRole, MessageType, NewMessage, ChatTurn, TextMessageRequest};
pub use voice_job::{VoiceJob, VoiceJobStatus, VoiceJobUpdate};

pub use super::database::StoreError;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
/// Upper bound on any single page.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Clamp caller-provided `skip`/`limit` to sane bounds.
pub fn page_bounds(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    (skip, limit)
}

// Application state
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub llm: Arc<dyn LlmClient>,
    pub config: Arc<Config>,
    pub storage: AudioStorage,
}

impl AppState {
    pub fn new(db: SqlitePool, llm: Arc<dyn LlmClient>, config: Config) -> Self {
        let storage = AudioStorage::new(config.media_dir.clone());
        Self {
            db,
            llm,
            config: Arc::new(config),
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::page_bounds;

    #[test]
    fn page_bounds_clamp() {
        assert_eq!(page_bounds(None, None), (0, 100));
        assert_eq!(page_bounds(Some(-3), Some(0)), (0, 1));
        assert_eq!(page_bounds(Some(5), Some(50_000)), (5, 1000));
    }
}
