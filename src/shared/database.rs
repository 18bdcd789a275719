use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{error, info};

/// Store failures, classified at the repository boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique, foreign-key, not-null or check constraint violation.
    #[error("Constraint violation: {detail}")]
    Conflict { detail: String, source: sqlx::Error },

    /// Connection, pool, lock or disk I/O failure.
    #[error("Store unavailable: {detail}")]
    Unavailable { detail: String, source: sqlx::Error },

    /// Malformed query, schema mismatch, decode failure.
    #[error("Store error: {0}")]
    Internal(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        classify(err)
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Internal(sqlx::Error::Migrate(Box::new(err)))
    }
}

fn classify(err: sqlx::Error) -> StoreError {
    use sqlx::error::ErrorKind;

    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    let field = message
                        .split("UNIQUE constraint failed:")
                        .last()
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    StoreError::Conflict { detail: format!("Duplicate value for {field}"), source: err }
                }
                ErrorKind::ForeignKeyViolation => StoreError::Conflict {
                    detail: "Referenced record does not exist or is being referenced".to_string(),
                    source: err,
                },
                ErrorKind::NotNullViolation => {
                    let field = message
                        .split("NOT NULL constraint failed:")
                        .last()
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    StoreError::Conflict { detail: format!("Required field {field} cannot be empty"), source: err }
                }
                ErrorKind::CheckViolation => StoreError::Conflict {
                    detail: "Value does not meet check constraint requirements".to_string(),
                    source: err,
                },
                _ => {
                    let lower = message.to_lowercase();
                    if lower.contains("database is locked") || lower.contains("database is busy") {
                        StoreError::Unavailable {
                            detail: "Database is currently locked, please try again".to_string(),
                            source: err,
                        }
                    } else if lower.contains("unable to open database") {
                        StoreError::Unavailable { detail: "Could not open database file".to_string(), source: err }
                    } else if lower.contains("disk i/o error") {
                        StoreError::Unavailable {
                            detail: "Database disk I/O error occurred".to_string(),
                            source: err,
                        }
                    } else {
                        StoreError::Internal(err)
                    }
                }
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable {
            detail: "Database operation failed".to_string(),
            source: err,
        },
        _ => StoreError::Internal(err),
    }
}

/// Open the SQLite pool and apply embedded migrations.
///
/// `sqlite::memory:` gets a single long-lived connection so every query sees
/// the same in-memory database.
pub async fn init_database(database_url: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await.map_err(|e| {
        error!("Failed to open database {}: {}", database_url, e);
        StoreError::from(e)
    })?;

    run_migrations(&pool).await?;
    info!("Database ready at {}", database_url);

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
