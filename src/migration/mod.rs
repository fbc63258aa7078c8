//! Database connection, migrations and startup seeding
//!
//! Seeding goes through the services, so it behaves the same on the
//! PostgreSQL and in-memory stores and is safe to repeat.

use crate::config::DatabaseConfig;
use crate::state::HasServices;
use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Open the connection pool
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL is not set")?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database");
    Ok(pool)
}

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;

    info!("Database migrations completed");
    Ok(())
}

/// What a seeding pass inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub task_statuses: usize,
    pub labels: usize,
    pub admin_created: bool,
}

/// Insert the default task statuses, labels and the administrator if missing
pub async fn seed<S: HasServices>(state: &S) -> Result<SeedReport> {
    let task_statuses = state
        .task_status_service()
        .ensure_defaults()
        .await
        .context("Failed to seed task statuses")?;

    let labels = state
        .label_service()
        .ensure_defaults()
        .await
        .context("Failed to seed labels")?;

    let admin_created = match &state.config().admin {
        Some(admin) => state
            .user_service()
            .ensure_admin(&admin.email, &admin.password)
            .await
            .context("Failed to seed administrator")?,
        None => {
            info!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping administrator");
            false
        }
    };

    let report = SeedReport {
        task_statuses,
        labels,
        admin_created,
    };
    info!(
        task_statuses = report.task_statuses,
        labels = report.labels,
        admin_created = report.admin_created,
        "Seeding completed"
    );
    Ok(report)
}
