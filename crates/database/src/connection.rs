//! Database connection management

use anyhow::{Context, Result};
use contabot_config::DatabaseConfig;
use once_cell::sync::Lazy;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::path::Path;
use tokio::fs;
use tracing::info;

// The Any driver registry must be populated before the first connection.
static ANY_DRIVERS: Lazy<()> = Lazy::new(sqlx::any::install_default_drivers);

/// Prepare and establish a database connection
pub async fn prepare_database(config: &DatabaseConfig) -> Result<AnyPool> {
    Lazy::force(&ANY_DRIVERS);

    let url = config.connection_url();
    ensure_sqlite_path(&url).await?;

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&url)
        .await
        .with_context(|| {
            format!(
                "failed to connect to database {} on {}",
                config.database, config.host
            )
        })?;

    if url.starts_with("sqlite") {
        // Enable foreign keys for SQLite
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .context("failed to enable foreign keys for sqlite")?;

        // Set busy timeout to prevent database locked errors
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await
            .context("failed to set busy timeout for sqlite")?;
    }

    info!(host = %config.host, database = %config.database, "database connection established");
    Ok(pool)
}

/// Ensure the SQLite database file and directory exist
async fn ensure_sqlite_path(url: &str) -> Result<()> {
    let Some(raw_path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let sqlite_path = raw_path.split('?').next().unwrap_or(raw_path);
    if sqlite_path.is_empty() || sqlite_path == ":memory:" {
        return Ok(());
    }

    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create sqlite directory {}", parent.display())
            })?;
        }
    }

    if fs::metadata(path).await.is_err() {
        fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .await
            .with_context(|| format!("failed to create sqlite database file {}", path.display()))?;
    }

    Ok(())
}

/// Database connection wrapper for easier management
#[derive(Clone)]
pub struct DatabaseConnection {
    pub pool: AnyPool,
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let pool = prepare_database(config).await?;
        Ok(Self { pool })
    }

    /// Create a new database connection from an existing pool
    pub fn from_pool(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Test the database connection
    pub async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("failed to test database connection")?;
        Ok(())
    }
}
