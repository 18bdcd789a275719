use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::llm::OpenAiClient;
use crate::server::rest::create_router;
use crate::shared::{init_database, AppState};

pub async fn run_rest_server(config: Config) -> Result<()> {
    info!(
        r#"
 ____            _
|  _ \ __ _ _ __| | ___ _   _
| |_) / _` | '__| |/ _ \ | | |
|  __/ (_| | |  | |  __/ |_| |
|_|   \__,_|_|  |_|\___|\__, |
                        |___/
Starting Parley REST API service...
Version: {} ({})
"#,
        config.app_version, config.environment
    );

    info!("Connecting to database...");
    let db = match init_database(&config.database_url).await {
        Ok(pool) => {
            info!("Connected to database successfully!");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            error!("Please ensure DATABASE_URL is set correctly");
            error!("Example: DATABASE_URL=sqlite://parley.db");
            return Err(anyhow::anyhow!(
                "Database not available. Please check your configuration."
            ));
        }
    };

    tokio::fs::create_dir_all(&config.media_dir)
        .await
        .with_context(|| format!("Failed to create media directory {}", config.media_dir.display()))?;

    let llm = OpenAiClient::new(config.llm.clone()).context("Failed to create LLM client")?;
    let bind_addr = config.bind_address();
    let app_state = Arc::new(AppState::new(db, Arc::new(llm), config));

    info!("Building REST API routes...");
    let app = create_router(app_state);

    info!("Binding to: {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Server started successfully!");
    info!("REST API Endpoint: http://{}", bind_addr);
    info!("Swagger UI: http://{}/swagger-ui/", bind_addr);
    info!("OpenAPI JSON: http://{}/api-docs/openapi.json", bind_addr);
    info!("Ready to accept requests...");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down Parley server...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
