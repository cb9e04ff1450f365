//! Error handling for the Glossary REST API
//!
//! Every failure renders as
//! `{"error": msg, "errorDetails": {"errorCode": "ERR_...", "errorMessage": msg}}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glossary_core::GlossaryError;
use serde_json::json;

use crate::contract::ErrorKind;

/// API Error type for returning standard error responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),
    /// Not found (404)
    NotFound(String),
    /// Conflict (409)
    Conflict(String),
    /// Unprocessable entity (422)
    UnprocessableEntity(String),
    /// Internal server error (500)
    InternalServerError(String),
}

impl ApiError {
    /// Map a failure class onto an HTTP error
    pub fn from_kind(kind: ErrorKind, err: &GlossaryError) -> Self {
        let message = err.to_string();
        match kind {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::InvalidInput => ApiError::UnprocessableEntity(message),
            ErrorKind::Duplicate => ApiError::Conflict(message),
            ErrorKind::Unauthorized => ApiError::Unauthorized(message),
            // Store details stay in the logs
            ErrorKind::Internal => ApiError::InternalServerError("Internal server error".to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code_and_message(&self) -> (&'static str, &str) {
        match self {
            ApiError::Unauthorized(msg) => ("ERR_UNAUTHORIZED", msg),
            ApiError::NotFound(msg) => ("ERR_NOT_FOUND", msg),
            ApiError::Conflict(msg) => ("ERR_CONFLICT", msg),
            ApiError::UnprocessableEntity(msg) => ("ERR_VALIDATION_ERROR", msg),
            ApiError::InternalServerError(msg) => ("ERR_INTERNAL_SERVER_ERROR", msg),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (code, message) = self.code_and_message();
        write!(f, "{} ({}): {}", self.status(), code, message)
    }
}

impl From<GlossaryError> for ApiError {
    fn from(err: GlossaryError) -> Self {
        ApiError::from_kind(ErrorKind::of(&err), &err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid query parameter: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (error_code, message) = self.code_and_message();

        let body = Json(json!({
            "error": message,
            "errorDetails": {
                "errorCode": error_code,
                "errorMessage": message,
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glossary_errors_map_to_statuses() {
        let cases = [
            (GlossaryError::not_found("Term 9"), StatusCode::NOT_FOUND),
            (GlossaryError::validation("bad type"), StatusCode::UNPROCESSABLE_ENTITY),
            (GlossaryError::Conflict("dup".into()), StatusCode::CONFLICT),
            (GlossaryError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (GlossaryError::StateStoreError("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(GlossaryError::StateStoreError("password=hunter2".into()));
        assert!(!err.to_string().contains("hunter2"));
    }
}
