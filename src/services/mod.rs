//! Business rules sitting between the HTTP handlers and the repositories.

pub mod agents;
pub mod messages;
pub mod sessions;

pub use agents::AgentService;
pub use messages::{MessageService, VoiceReply};
pub use sessions::SessionService;
