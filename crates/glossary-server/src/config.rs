//! Configuration for the Glossary Server
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::error::{ServerError, ServerResult};

const MEMORY_SCHEME: &str = "memory://";
const POSTGRES_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind both listeners to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// REST listener port
    #[serde(default = "default_port")]
    pub port: u16,

    /// gRPC listener port
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// `postgres://...` or `memory://`
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Pool acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub database_acquire_timeout_secs: u64,

    /// Apply the schema at startup
    #[serde(default)]
    pub run_migrations: bool,

    /// Shared bearer secret; `None` disables the access gate
    #[serde(default)]
    pub api_auth_token: Option<String>,

    /// Origins allowed by CORS on the REST listener
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Log settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log format and level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Deployment environment; `production` switches to JSON logs
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Storage backend selected by `DATABASE_URL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    Memory,
    Postgres(String),
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_rpc_port() -> u16 {
    50051
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:8080".to_string()]
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_env: default_app_env(),
            log_level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Read `APP_ENV` and `LOG_LEVEL` so logging can start before the full config loads
    pub fn from_env() -> Self {
        let mut logging = Self::default();
        if let Ok(app_env) = env::var("APP_ENV") {
            logging.app_env = app_env;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            logging.log_level = log_level;
        }
        logging
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_host(),
            port: default_port(),
            rpc_port: default_rpc_port(),
            database_url: String::new(),
            database_max_connections: default_max_connections(),
            database_acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
            api_auth_token: None,
            cors_origins: default_cors_origins(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Start with defaults
        let mut config = Self::default();

        if let Some(host) = lookup("SERVER_HOST") {
            config.bind_address = host;
        }
        parse_into(&lookup, "SERVER_PORT", &mut config.port);
        parse_into(&lookup, "RPC_PORT", &mut config.rpc_port);

        if let Some(database_url) = lookup("DATABASE_URL") {
            config.database_url = database_url;
        }
        parse_into(&lookup, "DATABASE_MAX_CONNECTIONS", &mut config.database_max_connections);
        parse_into(
            &lookup,
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            &mut config.database_acquire_timeout_secs,
        );
        if let Some(run_migrations) = lookup("RUN_MIGRATIONS") {
            config.run_migrations = run_migrations.eq_ignore_ascii_case("true") || run_migrations == "1";
        }

        // An empty secret means the same as no secret
        config.api_auth_token = lookup("API_AUTH_TOKEN").filter(|token| !token.is_empty());

        if let Some(origins) = lookup("BACKEND_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(app_env) = lookup("APP_ENV") {
            config.logging.app_env = app_env;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.logging.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ServerResult<()> {
        self.database_backend()?;
        if self.database_max_connections == 0 {
            return Err(ServerError::ConfigError(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage backend named by `database_url`
    pub fn database_backend(&self) -> ServerResult<DatabaseBackend> {
        let url = self.database_url.trim();
        if url.is_empty() {
            return Err(ServerError::ConfigError("DATABASE_URL is required".to_string()));
        }
        if url.starts_with(MEMORY_SCHEME) {
            return Ok(DatabaseBackend::Memory);
        }
        if POSTGRES_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return Ok(DatabaseBackend::Postgres(url.to_string()));
        }
        Err(ServerError::ConfigError(format!(
            "Unsupported DATABASE_URL scheme: {}",
            url.split("://").next().unwrap_or(url)
        )))
    }

    /// REST listener address
    pub fn rest_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// gRPC listener address
    pub fn rpc_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.rpc_port)
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Invalid {} value: {}", key, raw),
        }
    }
}
