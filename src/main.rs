use anyhow::Result;
use clap::{Parser, Subcommand};

use parley::config::{Config, LogSettings};
use parley::server::run_rest_server;
use parley::shared::{self, logging::init_logging};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - Agent conversation service with text and voice replies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server (default command)
    Serve {
        /// Host for API server
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port for API server
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply database migrations and exit
    Migrate {
        /// Database connection string
        #[arg(long, env = "DATABASE_URL", default_value = "sqlite://parley.db")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { host: None, port: None });

    match command {
        Commands::Serve { host, port } => {
            let mut config = Config::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let _logging = init_logging(&config.log_dir, "parley", &config.log_level)?;
            run_rest_server(config).await?;
        }
        Commands::Migrate { database_url } => {
            let settings = LogSettings::from_env();
            let _logging = init_logging(&settings.log_dir, "parley", &settings.log_level)?;

            // Opening the pool applies pending migrations
            shared::init_database(&database_url).await?;
            tracing::info!("Migrations applied to {}", database_url);
        }
    }

    Ok(())
}
