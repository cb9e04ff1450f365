//!
//! Glossary Server - REST and gRPC front-ends for the glossary service
//!
//! Both listeners share one [`GlossaryService`] and one [`AccessGate`].

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glossary_core::GlossaryService;
use glossary_state_inmemory::InMemoryStateStoreProvider;
use glossary_state_postgres::{PostgresConfig, PostgresStateStoreProvider};

/// REST front-end
pub mod api;

/// Shared-secret access gate
pub mod auth;

/// Configuration module
pub mod config;

/// Operations and outcomes shared by both front-ends
pub mod contract;

/// Error module
pub mod error;

/// gRPC front-end
pub mod rpc;

/// Server module
pub mod server;

// Re-export key types
pub use auth::AccessGate;
pub use config::{DatabaseBackend, LoggingConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::GlossaryServer;

/// Build the stores and serve both listeners until shutdown
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let service = create_service(&config).await?;
    GlossaryServer::new(config, service).run().await
}

/// Initialize logging; JSON output when `APP_ENV=production`
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.context("Failed to set global default subscriber")?;

    info!(
        app_env = %config.app_env,
        log_format = if config.is_production() { "json" } else { "text" },
        "Logging initialized"
    );
    Ok(())
}

/// Create the glossary service on the backend named by `DATABASE_URL`
pub async fn create_service(config: &ServerConfig) -> ServerResult<GlossaryService> {
    let (terms, relations) = match config.database_backend()? {
        DatabaseBackend::Memory => {
            info!("Using in-memory glossary store");
            InMemoryStateStoreProvider::new().create_repositories()
        }
        DatabaseBackend::Postgres(connection_string) => {
            info!(
                max_connections = config.database_max_connections,
                run_migrations = config.run_migrations,
                "Using PostgreSQL glossary store"
            );
            let provider = PostgresStateStoreProvider::with_config(PostgresConfig {
                connection_string,
                max_connections: config.database_max_connections,
                acquire_timeout_secs: config.database_acquire_timeout_secs,
                run_migrations: config.run_migrations,
            })
            .await?;
            provider.create_repositories()
        }
    };

    Ok(GlossaryService::new(terms, relations))
}
