//! Database connection management for the seeder.
//!
//! Opens the SeaORM connection used by every seeding phase, applies the
//! schema migrations and offers a cheap liveness probe.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;

/// Connection attempts made before giving up.
pub const CONNECT_ATTEMPTS: u32 = 5;

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Errors that can occur while opening the seeding database.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database after {attempts} attempts: {source}")]
    ConnectionFailed {
        attempts: u32,
        #[source]
        source: DbErr,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Opens the connection to the database the seeder writes into.
///
/// With `db_schema` set, the schema becomes the session `search_path` so the
/// seeded tables and the migrations table live there. Failed connection
/// attempts are retried [`CONNECT_ATTEMPTS`] times in total, doubling the
/// pause each time.
///
/// ```no_run
/// use marketplace_seeder::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let db = init_pool(&AppConfig::default()).await?;
///     marketplace_seeder::db::migrate(&db).await
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.trim().is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(cfg.database_url.clone());
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    if let Some(schema) = &cfg.db_schema {
        opt.set_schema_search_path(schema.clone());
    }

    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 1;
    loop {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                log::info!("Connected to seeding database (attempt {})", attempt);
                return Ok(conn);
            }
            Err(source) if attempt >= CONNECT_ATTEMPTS => {
                log::error!("Giving up on database after {} attempts: {}", attempt, source);
                return Err(DatabaseError::ConnectionFailed {
                    attempts: attempt,
                    source,
                }
                .into());
            }
            Err(err) => {
                log::warn!(
                    "Database connection attempt {} failed: {}, retrying in {:?}",
                    attempt,
                    err,
                    backoff
                );
                sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
        }
    }
}

/// Brings the schema up to date by applying every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("Failed to apply database migrations")?;
    log::info!("Database schema is up to date");
    Ok(())
}

/// Runs `SELECT 1` to confirm the connection is usable before seeding.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    db.query_one(stmt)
        .await
        .context("Database health check failed")?;
    Ok(())
}
