//! Main Glossary Server implementation
//!
//! One server owns the stores and the access gate and serves them on two
//! listeners: REST on `port`, gRPC on `rpc_port`.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{info, warn};

use glossary_core::GlossaryService;

use crate::auth::AccessGate;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Main server implementation
pub struct GlossaryServer {
    config: ServerConfig,
    service: GlossaryService,
    gate: AccessGate,
}

impl std::fmt::Debug for GlossaryServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlossaryServer")
            .field("rest_addr", &self.config.rest_addr())
            .field("rpc_addr", &self.config.rpc_addr())
            .field("gate", &self.gate)
            .finish()
    }
}

impl GlossaryServer {
    /// Create a server; the gate is built from `api_auth_token`
    pub fn new(config: ServerConfig, service: GlossaryService) -> Self {
        let gate = AccessGate::new(config.api_auth_token.clone());
        if !gate.is_enabled() {
            warn!("API_AUTH_TOKEN is not set; both listeners accept unauthenticated requests");
        }
        Self { config, service, gate }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &GlossaryService {
        &self.service
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Router for the REST listener
    pub fn rest_router(self: &Arc<Self>) -> Router {
        crate::api::build_router(Arc::clone(self))
    }

    /// Router for the gRPC listener
    pub fn rpc_router(self: &Arc<Self>) -> ServerResult<tonic::transport::server::Router> {
        crate::rpc::build_router(Arc::clone(self))
    }

    /// Bind both listeners and serve until ctrl-c
    ///
    /// If either listener fails the other is dropped too.
    pub async fn run(self) -> ServerResult<()> {
        let server = Arc::new(self);

        let rest_listener = bind(&server.config.rest_addr()).await?;
        let rpc_listener = bind(&server.config.rpc_addr()).await?;
        info!("REST API listening on {}", local_addr(&rest_listener));
        info!(
            service = crate::rpc::SERVICE_NAME,
            "gRPC API listening on {}",
            local_addr(&rpc_listener)
        );

        let rest = axum::serve(rest_listener, server.rest_router()).with_graceful_shutdown(shutdown_signal());
        let rpc = server
            .rpc_router()?
            .serve_with_incoming_shutdown(TcpListenerStream::new(rpc_listener), shutdown_signal());

        tokio::try_join!(
            async { rest.await.map_err(|err| ServerError::InternalError(format!("REST listener: {}", err))) },
            async { rpc.await.map_err(|err| ServerError::InternalError(format!("gRPC listener: {}", err))) },
        )?;

        info!("Glossary server stopped");
        Ok(())
    }
}

async fn bind(addr: &str) -> ServerResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|source| ServerError::BindError {
        addr: addr.to_string(),
        source,
    })
}

fn local_addr(listener: &TcpListener) -> String {
    listener
        .local_addr()
        .map(|addr: SocketAddr| addr.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
