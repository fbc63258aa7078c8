use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use task_manager::{
    config::{Config, TelemetryConfig},
    migration,
    openapi::ApiDoc,
    server, telemetry,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "task-manager", version, about = "Task manager backend service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Apply migrations, insert default data and exit
    Seed,
    /// Print the OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Openapi) = cli.command {
        let doc = serde_json::to_string_pretty(&ApiDoc::build())?;
        println!("{doc}");
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let telemetry = telemetry::init(&TelemetryConfig::from_env())?;
    let config = Config::from_env()?;
    if config.uses_dev_jwt_secret() {
        warn!("JWT_SECRET is not set, signing tokens with the development secret");
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting task manager on {}", config.http_addr());
            server::run(config, telemetry.prometheus_handle()).await
        }
        Command::Migrate => {
            let pool = migration::connect(&config.database).await?;
            migration::run_migrations(&pool).await?;
            pool.close().await;
            Ok(())
        }
        Command::Seed => {
            let pool = migration::connect(&config.database).await?;
            migration::run_migrations(&pool).await?;
            let state = server::PgAppState::postgres(config, pool.clone())
                .context("Failed to build application state")?;
            migration::seed(&state).await?;
            pool.close().await;
            Ok(())
        }
        Command::Openapi => Ok(()),
    }
}
