//! Database client and connection management

use crate::DbResult;
use lightbnb_config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Pool sizing knobs. Everything else is left to sqlx defaults.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for PoolSettings {
    fn from(cfg: &DatabaseConfig) -> Self {
        Self {
            max_connections: cfg.max_connections,
            acquire_timeout: cfg.acquire_timeout(),
        }
    }
}

impl PoolSettings {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Database client wrapping sqlx connection pool
///
/// Cloning is cheap: clones share the same pool.
#[derive(Clone)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    /// Create a new database client from connection string
    pub async fn new(database_url: &str) -> DbResult<Self> {
        Self::connect(database_url, &PoolSettings::default()).await
    }

    /// Create a new database client from connection string and pool settings
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> DbResult<Self> {
        let opts = PgConnectOptions::from_str(database_url)?;
        Self::with_options(opts, settings).await
    }

    /// Connect using `cfg.url` when set, the individual fields otherwise
    pub async fn from_config(cfg: &DatabaseConfig) -> DbResult<Self> {
        let settings = PoolSettings::from(cfg);

        match &cfg.url {
            Some(url) => Self::connect(url, &settings).await,
            None => {
                let opts = DbConnectionBuilder::from(cfg).build();
                Self::with_options(opts, &settings).await
            }
        }
    }

    /// Create a new database client with custom options
    pub async fn with_options(opts: PgConnectOptions, settings: &PoolSettings) -> DbResult<Self> {
        let pool = settings.pool_options().connect_with(opts).await?;

        debug!(
            max_connections = settings.max_connections,
            "Opened connection pool"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return, then close them
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// PostgreSQL connect options seeded from [`DatabaseConfig`]
///
/// Settings left out fall back to the `PG*` environment variables that
/// sqlx reads.
pub struct DbConnectionBuilder {
    opts: PgConnectOptions,
}

impl From<&DatabaseConfig> for DbConnectionBuilder {
    fn from(cfg: &DatabaseConfig) -> Self {
        let builder = Self {
            opts: PgConnectOptions::new()
                .host(&cfg.host)
                .port(cfg.port)
                .username(&cfg.user)
                .database(&cfg.name),
        };

        match &cfg.password {
            Some(password) => builder.password(password),
            None => builder,
        }
    }
}

impl DbConnectionBuilder {
    /// Default LightBnB settings against `database`
    pub fn new(database: &str) -> Self {
        Self::from(&DatabaseConfig {
            name: database.to_string(),
            ..Default::default()
        })
    }

    pub fn host(self, host: &str) -> Self {
        Self {
            opts: self.opts.host(host),
        }
    }

    pub fn port(self, port: u16) -> Self {
        Self {
            opts: self.opts.port(port),
        }
    }

    pub fn username(self, username: &str) -> Self {
        Self {
            opts: self.opts.username(username),
        }
    }

    pub fn password(self, password: &str) -> Self {
        Self {
            opts: self.opts.password(password),
        }
    }

    pub fn build(self) -> PgConnectOptions {
        self.opts
    }
}
