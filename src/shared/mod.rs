pub mod database;
pub mod models;
pub mod logging;

pub use models::AppState;
pub use database::{init_database, run_migrations};
