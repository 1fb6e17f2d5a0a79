use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "contabot.toml",
    "config/contabot.toml",
    "crates/config/contabot.toml",
    "../contabot.toml",
    "../config/contabot.toml",
    "../crates/config/contabot.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Full connection URL override. When set, the host/port/user/password
    /// fields are ignored. Used for SQLite databases in development and tests.
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "main".to_string(),
            max_connections: 10,
            url: None,
        }
    }
}

impl DatabaseConfig {
    /// Build the connection URL for the configured database.
    ///
    /// ```
    /// use contabot_config::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::default();
    /// assert_eq!(config.connection_url(), "mysql://root:@localhost:3306/main");
    /// ```
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use contabot_config::load;
///
/// std::env::remove_var("CONTABOT_CONFIG");
/// std::env::remove_var("DDBB_PORT");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.database.host.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = DatabaseConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("database.host", defaults.host.clone())
        .unwrap()
        .set_default("database.port", i64::from(defaults.port))
        .unwrap()
        .set_default("database.user", defaults.user.clone())
        .unwrap()
        .set_default("database.password", defaults.password.clone())
        .unwrap()
        .set_default("database.database", defaults.database.clone())
        .unwrap()
        .set_default("database.max_connections", i64::from(defaults.max_connections))
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("CONTABOT").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CONTABOT_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CONTABOT_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    apply_database_environment(&mut config.database)?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

/// Deployments pass database credentials through the `DDBB_*` environment
/// variables; they win over every other configuration source.
fn apply_database_environment(database: &mut DatabaseConfig) -> anyhow::Result<()> {
    if let Ok(user) = std::env::var("DDBB_USER") {
        database.user = user;
    }
    if let Ok(password) = std::env::var("DDBB_PASSWORD") {
        database.password = password;
    }
    if let Ok(host) = std::env::var("DDBB_HOST") {
        database.host = host;
    }
    if let Ok(port) = std::env::var("DDBB_PORT") {
        database.port = port
            .parse()
            .with_context(|| format!("invalid DDBB_PORT value {port}"))?;
    }

    Ok(())
}
