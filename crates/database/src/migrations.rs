//! Database schema bootstrap
//!
//! Idempotent DDL executed at startup, one dialect per supported backend.
//! Timestamps are stored as RFC 3339 text and booleans as integers so both
//! backends decode identically.

use anyhow::{Context, Result};
use sqlx::AnyPool;
use tracing::info;

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        name TEXT NOT NULL,
        currency TEXT NOT NULL,
        language TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        organization_id INTEGER REFERENCES organizations(id),
        created_at TEXT NOT NULL,
        whatsapp_phone TEXT NOT NULL,
        name TEXT NOT NULL,
        is_admin INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER REFERENCES users(id),
        created_at TEXT NOT NULL,
        label TEXT NOT NULL,
        value REAL NOT NULL,
        currency TEXT NOT NULL,
        value_converted REAL NOT NULL,
        description TEXT NOT NULL
    )",
];

const MYSQL_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS organizations (
        id BIGINT PRIMARY KEY AUTO_INCREMENT,
        created_at VARCHAR(64) NOT NULL,
        name VARCHAR(255) NOT NULL,
        currency VARCHAR(8) NOT NULL,
        language VARCHAR(8) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id BIGINT PRIMARY KEY AUTO_INCREMENT,
        organization_id BIGINT,
        created_at VARCHAR(64) NOT NULL,
        whatsapp_phone VARCHAR(32) NOT NULL,
        name VARCHAR(255) NOT NULL,
        is_admin TINYINT NOT NULL DEFAULT 0,
        FOREIGN KEY (organization_id) REFERENCES organizations(id)
    )",
    "CREATE TABLE IF NOT EXISTS transactions (
        id BIGINT PRIMARY KEY AUTO_INCREMENT,
        user_id BIGINT,
        created_at VARCHAR(64) NOT NULL,
        label VARCHAR(255) NOT NULL,
        value DOUBLE NOT NULL,
        currency VARCHAR(8) NOT NULL,
        value_converted DOUBLE NOT NULL,
        description TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )",
];

/// Apply the schema for the database behind the given connection URL
pub async fn run_migrations(pool: &AnyPool, url: &str) -> Result<()> {
    let statements = if url.starts_with("mysql") {
        MYSQL_SCHEMA
    } else {
        SQLITE_SCHEMA
    };

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("database migrations failed")?;
    }

    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use contabot_config::DatabaseConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_migrations.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: Some(db_url.clone()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool, &db_url).await.unwrap();

        for table in ["organizations", "users", "transactions"] {
            let name: String = sqlx::query_scalar(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(name, table);
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_migrations.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: Some(db_url.clone()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool, &db_url).await.unwrap();
        run_migrations(&pool, &db_url).await.unwrap();
    }
}
