//! REST front-end for the Glossary Server
//!
//! JSON over HTTP under `/api`. Handlers decode their inputs, run a
//! contract [`Operation`] and encode the [`Outcome`] through
//! [`RestFrontEnd`].

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub mod docs;
pub mod errors;
pub mod graph;
pub mod models;
pub mod relations;
pub mod terms;

use glossary_core::GlossaryError;

use crate::auth::require_bearer;
use crate::contract::{execute, ErrorKind, FrontEnd, Operation, Outcome};
use crate::server::GlossaryServer;
use errors::ApiError;
use models::{GraphBody, TermBody};

/// Build the router for API endpoints
pub fn build_router(server: Arc<GlossaryServer>) -> Router {
    let gate = middleware::from_fn_with_state(server.gate().clone(), require_bearer);
    let cors = cors_layer(&server.config().cors_origins);

    Router::new()
        // Health check
        .route("/api/health", get(graph::health_check))
        // Terms
        .route("/api/terms", get(terms::list_terms).post(terms::create_term))
        .route(
            "/api/terms/:id",
            get(terms::get_term).put(terms::update_term).delete(terms::delete_term),
        )
        .route("/api/terms/by-keyword/:keyword", get(terms::get_term_by_keyword))
        // Relations
        .route(
            "/api/relations",
            get(relations::list_relations).post(relations::create_relation),
        )
        .route(
            "/api/relations/:id",
            get(relations::get_relation)
                .put(relations::update_relation)
                .delete(relations::delete_relation),
        )
        // Graph export
        .route("/api/graph", get(graph::get_graph))
        // Documentation
        .route("/api/openapi.json", get(docs::openapi_json))
        .route("/api/docs", get(docs::docs_page))
        .route("/api/redoc", get(docs::redoc_page))
        .fallback(not_found)
        // Outermost first: trace, CORS (answers preflight), then the gate
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors).layer(gate))
        .with_state(server)
}

/// CORS for the configured origins, with credentials
///
/// Credentialed CORS cannot use wildcards, so methods and headers mirror the request.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Execute an operation and encode it for REST
pub(crate) async fn run(server: &GlossaryServer, operation: Operation) -> Result<Response, ApiError> {
    RestFrontEnd::render(execute(server.service(), operation).await)
}

/// REST encoding of the protocol contract
pub struct RestFrontEnd;

impl FrontEnd for RestFrontEnd {
    type Success = Response;
    type Failure = ApiError;

    fn encode(outcome: Outcome) -> Response {
        match outcome {
            Outcome::Health => Json(json!({"status": "ok"})).into_response(),
            Outcome::Term(term) => Json(TermBody::from(term)).into_response(),
            Outcome::TermCreated(term) => (StatusCode::CREATED, Json(TermBody::from(term))).into_response(),
            Outcome::Terms(terms) => {
                Json(terms.into_iter().map(TermBody::from).collect::<Vec<_>>()).into_response()
            }
            Outcome::Relation(relation) => Json(relation).into_response(),
            Outcome::RelationCreated(relation) => (StatusCode::CREATED, Json(relation)).into_response(),
            Outcome::Relations(relations) => Json(relations).into_response(),
            Outcome::Graph(snapshot) => Json(GraphBody::from(snapshot)).into_response(),
            Outcome::Deleted => StatusCode::NO_CONTENT.into_response(),
        }
    }

    fn fail(kind: ErrorKind, err: &GlossaryError) -> ApiError {
        ApiError::from_kind(kind, err)
    }
}
