//! gRPC front-end for the Glossary Server
//!
//! Serves `glossary.GlossaryService` from `proto/glossary.proto` behind the
//! access gate interceptor, plus gRPC server reflection. Every method runs
//! through the same contract [`Operation`](crate::contract::Operation) as the
//! REST routes.

use std::sync::Arc;

use tonic::transport::{server::Router, Server};
use tracing::info_span;

pub mod convert;
pub mod service;

use crate::auth::GateInterceptor;
use crate::error::{ServerError, ServerResult};
use crate::server::GlossaryServer;
use proto::glossary_service_server::GlossaryServiceServer;
use service::GlossaryRpc;

/// Generated protobuf messages, client and server for the `glossary` package
pub mod proto {
    tonic::include_proto!("glossary");

    /// Encoded descriptors served by reflection
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("glossary_descriptor");
}

/// Fully qualified service name
pub const SERVICE_NAME: &str = "glossary.GlossaryService";

/// Build the gRPC router: the gated glossary service and reflection
pub fn build_router(server: Arc<GlossaryServer>) -> ServerResult<Router> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build()
        .map_err(|err| ServerError::InternalError(format!("gRPC reflection: {}", err)))?;

    let gate = GateInterceptor::new(server.gate().clone());
    let glossary = GlossaryServiceServer::with_interceptor(GlossaryRpc::new(server), gate);

    Ok(Server::builder()
        .trace_fn(|request| info_span!("grpc", path = %request.uri().path()))
        .add_service(glossary)
        .add_service(reflection))
}
