use std::path::Path;

use anyhow::{Context, Result};
use contabot_config::AppConfig;
use contabot_runtime::BackendServices;
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = Some(database_url);
    config.database.max_connections = max_connections;
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_applies_schema_and_returns_usable_pool() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(sqlite_url(&db_path), 1);

    let services = initialise(&config).await?;

    let table: String = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
    )
    .fetch_one(&services.db_pool)
    .await
    .context("users table should exist after initialisation")?;
    assert_eq!(table, "users");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_is_idempotent_across_restarts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/restart.db");

    let first = initialise(&build_config(sqlite_url(&db_path), 1)).await?;
    first.db_pool.close().await;

    let second = initialise(&build_config(sqlite_url(&db_path), 1)).await?;
    second.db_pool.close().await;

    Ok(())
}
