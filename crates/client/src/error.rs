//! Client error types.

use cellar_core::record::FieldError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let error = ClientError::ServerError {
            status: 422,
            message: "INVALID_FILTER_BY_FORMULA".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Server returned 422: INVALID_FILTER_BY_FORMULA"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = ClientError::from(ConfigError::MissingToken);
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing API token (set CELLAR_TOKEN or --token)"
        );
    }

    #[test]
    fn test_field_error_is_transparent() {
        let error = ClientError::from(FieldError::InvalidFieldName("a}".to_string()));
        assert_eq!(
            error.to_string(),
            "Invalid field name 'a}': braces are not allowed"
        );
    }
}
