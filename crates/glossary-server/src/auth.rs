//! Shared-secret access gate
//!
//! The same gate guards both listeners: as axum middleware on REST and as a
//! tonic interceptor on gRPC. Either way a rejected request never reaches a
//! handler or a store.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use glossary_core::GlossaryError;
use std::sync::Arc;
use tonic::{service::Interceptor, Status};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::contract::ErrorKind;

/// REST paths served without a credential: the API documentation
pub const EXEMPT_PATHS: [&str; 3] = ["/api/openapi.json", "/api/docs", "/api/redoc"];

/// gRPC metadata key carrying the bearer token
pub const AUTHORIZATION_METADATA: &str = "authorization";

const BEARER_SCHEME: &str = "bearer";

/// Bearer-token gate; a no-op when no secret is configured
#[derive(Clone, Default)]
pub struct AccessGate {
    token: Option<Arc<str>>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl AccessGate {
    /// Create a gate; an empty secret leaves it disabled
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()).map(Arc::from),
        }
    }

    /// A gate that lets every request through
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Preflight requests and documentation paths skip the check
    pub fn is_exempt(method: &Method, path: &str) -> bool {
        *method == Method::OPTIONS || EXEMPT_PATHS.contains(&path)
    }

    /// Check an `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<(), GlossaryError> {
        let Some(expected) = self.token.as_deref() else {
            return Ok(());
        };

        let header = header.ok_or_else(|| GlossaryError::Unauthorized("missing bearer token".to_string()))?;
        let token = header
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
            .map(|(_, token)| token)
            .ok_or_else(|| GlossaryError::Unauthorized("expected a bearer token".to_string()))?;

        if token != expected {
            return Err(GlossaryError::Unauthorized("invalid bearer token".to_string()));
        }
        Ok(())
    }
}

/// REST middleware enforcing the gate
pub async fn require_bearer(
    State(gate): State<AccessGate>,
    request: Request,
    next: Next,
) -> Response {
    if !gate.is_enabled() || AccessGate::is_exempt(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match gate.authorize(header) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            debug!(path = %request.uri().path(), error = %err, "Request rejected by access gate");
            ApiError::from_kind(ErrorKind::Unauthorized, &err).into_response()
        }
    }
}

/// Tonic interceptor enforcing the gate on gRPC calls
///
/// Reflection is served outside the interceptor, like the REST documentation.
#[derive(Debug, Clone)]
pub struct GateInterceptor {
    gate: AccessGate,
}

impl GateInterceptor {
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }
}

impl Interceptor for GateInterceptor {
    fn call(&mut self, request: tonic::Request<()>) -> Result<tonic::Request<()>, Status> {
        let header = request
            .metadata()
            .get(AUTHORIZATION_METADATA)
            .and_then(|value| value.to_str().ok());

        match self.gate.authorize(header) {
            Ok(()) => Ok(request),
            Err(err) => {
                debug!(error = %err, "gRPC call rejected by access gate");
                Err(Status::unauthenticated(err.to_string()))
            }
        }
    }
}
