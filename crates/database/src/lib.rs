//! Contabot Database Crate
//!
//! This crate provides database functionality for the Contabot bookkeeping
//! assistant, including connection management, schema setup, and repository
//! implementations for organizations, users, and transactions.

use contabot_config::DatabaseConfig;
use sqlx::AnyPool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{OrganizationRepository, TransactionRepository, UserRepository};

// Re-export entities
pub use entities::{
    organization::{CreateOrganizationRequest, Currency, Language, Organization},
    transaction::{CreateTransactionRequest, Transaction},
    user::{CreateUserRequest, User},
};

// Re-export types
pub use types::{
    errors::{DatabaseError, OrganizationError, TransactionError, UserError},
    DatabaseResult, OrganizationResult, TransactionResult, UserResult,
};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database pool and apply the schema
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<AnyPool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool, &config.connection_url())
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_database() -> (AnyPool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: Some(db_url),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (pool, _temp_dir) = create_test_database().await;

        let table: String = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'organizations'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(table, "organizations");
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(enabled, 1);
    }
}
