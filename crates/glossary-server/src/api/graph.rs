//! Health and graph export routes

use axum::{extract::State, response::Response};
use std::sync::Arc;

use super::errors::ApiError;
use super::run;
use crate::contract::Operation;
use crate::server::GlossaryServer;

/// Health check handler
///
/// Sits behind the access gate like every other `/api` route.
pub async fn health_check(State(server): State<Arc<GlossaryServer>>) -> Result<Response, ApiError> {
    run(&server, Operation::Health).await
}

/// Every term as a node and every relation as an edge
pub async fn get_graph(State(server): State<Arc<GlossaryServer>>) -> Result<Response, ApiError> {
    run(&server, Operation::GetGraph).await
}
