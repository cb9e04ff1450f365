use thiserror::Error;

/// Core error type for the glossary service
///
/// Every store operation reports failures through this type. The protocol
/// front-ends translate the variant into their own failure representation
/// without changing its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlossaryError {
    /// Referenced term, relation or keyword does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness violation on the term key
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input (bad relation type, missing field, out-of-range value)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Rejected by the access gate
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backing store failure
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GlossaryError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        GlossaryError::ValidationError(message.into())
    }

    /// Shorthand for a missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        GlossaryError::NotFound(resource.into())
    }

    /// Whether the error is caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            GlossaryError::StateStoreError(_) | GlossaryError::ConfigurationError(_)
        )
    }
}

impl From<serde_json::Error> for GlossaryError {
    fn from(err: serde_json::Error) -> Self {
        GlossaryError::ValidationError(format!("JSON error: {}", err))
    }
}

/// Result type for glossary operations
pub type GlossaryResult<T> = Result<T, GlossaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (GlossaryError::NotFound("Term 7".to_string()), "Term 7 not found"),
            (GlossaryError::Conflict("dup".to_string()), "Conflict: dup"),
            (GlossaryError::ValidationError("bad".to_string()), "Validation error: bad"),
            (GlossaryError::Unauthorized("no token".to_string()), "Unauthorized: no token"),
            (GlossaryError::StateStoreError("db".to_string()), "State store error: db"),
            (GlossaryError::ConfigurationError("cfg".to_string()), "Configuration error: cfg"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(GlossaryError::not_found("Term 1").is_client_error());
        assert!(GlossaryError::validation("x").is_client_error());
        assert!(GlossaryError::Conflict("x".into()).is_client_error());
        assert!(!GlossaryError::StateStoreError("x".into()).is_client_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: GlossaryError = json_error.into();

        match error {
            GlossaryError::ValidationError(msg) => assert!(msg.contains("expected value")),
            _ => panic!("Expected ValidationError variant"),
        }
    }
}
