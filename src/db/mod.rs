//! PostgreSQL pool and embedded migrations

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("could not connect to PostgreSQL")]
    Connect(#[source] sqlx::Error),

    #[error("schema migration failed")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(max_connections, "PostgreSQL pool ready");
    Ok(pool)
}

/// Apply everything under `migrations/` that the database has not seen yet
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    let migrator = sqlx::migrate!("./migrations");
    tracing::info!(known = migrator.iter().count(), "Applying schema migrations");

    migrator.run(pool).await?;

    tracing::info!("Schema up to date");
    Ok(())
}
