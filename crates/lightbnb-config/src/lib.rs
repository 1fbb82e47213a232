use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the individual fields when set
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "vagrant".to_string(),
            password: None,
            name: "lightbnb".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// EnvFilter directive, used when RUST_LOG is unset
    pub filter: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

impl AppConfig {
    /// Load configuration from LIGHTBNB_CONFIG path (TOML) if present, then
    /// apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("LIGHTBNB_CONFIG").unwrap_or_else(|_| "lightbnb.toml".to_string());
        let mut cfg = if Path::new(&path).exists() {
            Self::from_path(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Override database settings from variables resolved by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = &mut self.database;

        if let Some(url) = lookup("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(host) = lookup("LIGHTBNB_DB_HOST") {
            db.host = host;
        }
        if let Some(port) = lookup("LIGHTBNB_DB_PORT") {
            db.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "LIGHTBNB_DB_PORT",
                value: port,
            })?;
        }
        if let Some(user) = lookup("LIGHTBNB_DB_USER") {
            db.user = user;
        }
        if let Some(password) = lookup("LIGHTBNB_DB_PASSWORD") {
            db.password = Some(password);
        }
        if let Some(name) = lookup("LIGHTBNB_DB_NAME") {
            db.name = name;
        }

        Ok(())
    }
}
