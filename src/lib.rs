pub mod audio;
pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod services;
pub mod shared;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use shared::AppState;
