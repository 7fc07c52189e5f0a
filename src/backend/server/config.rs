/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration:
 * listen address, SQLite database URL, JWT signing secret and lifetime,
 * and the bcrypt work factor.
 *
 * # Configuration Sources
 *
 * Values are resolved in this order (later wins):
 * 1. Built-in defaults suitable for local development
 * 2. An optional TOML file named by `DEVCONNECT_CONFIG`
 * 3. Environment variables (`SERVER_ADDR`, `DATABASE_URL`, `JWT_SECRET`,
 *    `TOKEN_TTL_DAYS`, `BCRYPT_COST`), including those loaded from `.env`
 */

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;

use crate::shared::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DATABASE_URL: &str = "sqlite://devconnect.db?mode=rwc";
const DEFAULT_JWT_SECRET: &str = "devconnect-development-secret";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

/// On-disk representation; every key is optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_days: Option<i64>,
    bcrypt_cost: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional TOML file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("DEVCONNECT_CONFIG") {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::File {
                path: path.clone(),
                message: e.to_string(),
            })?;
            config = config.merge_toml(&contents)?;
            tracing::info!("Loaded configuration file {}", path);
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        if config.jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set, using the development secret");
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply values from a TOML document
    pub fn merge_toml(mut self, contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::File {
            path: "<toml>".to_string(),
            message: e.to_string(),
        })?;

        if let Some(addr) = file.bind_addr {
            self.bind_addr = parse_addr(&addr)?;
        }
        if let Some(url) = file.database_url {
            self.database_url = url;
        }
        if let Some(secret) = file.jwt_secret {
            self.jwt_secret = secret;
        }
        if let Some(days) = file.token_ttl_days {
            self.token_ttl_days = days;
        }
        if let Some(cost) = file.bcrypt_cost {
            self.bcrypt_cost = cost;
        }
        Ok(self)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("SERVER_ADDR") {
            self.bind_addr = parse_addr(&addr)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(days) = lookup("TOKEN_TTL_DAYS") {
            self.token_ttl_days = days.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TOKEN_TTL_DAYS",
                message: format!("'{}' is not a number", days),
            })?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = cost.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("'{}' is not a number", cost),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.token_ttl_days <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_DAYS",
                message: "must be positive".to_string(),
            });
        }
        // bcrypt accepts work factors 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", self.bcrypt_cost),
            });
        }
        Ok(())
    }
}

fn parse_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    addr.parse().map_err(|_| ConfigError::InvalidValue {
        key: "SERVER_ADDR",
        message: format!("'{}' is not a socket address", addr),
    })
}

/// Open the SQLite pool and run migrations
///
/// Unlike an optional add-on service, the store is required: failure to
/// connect or migrate aborts startup.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // In-memory databases live and die with a single connection
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
