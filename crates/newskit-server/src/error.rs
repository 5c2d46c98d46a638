//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use newskit::ExportError;
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Export(ref e) => match e {
                ExportError::TemplateNotFound(_)
                | ExportError::EntityNotFound { .. }
                | ExportError::RevisionNotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
                ExportError::InvalidEntityId(_) | ExportError::InvalidMachineName(_) => {
                    (StatusCode::BAD_REQUEST, self.to_string())
                }
                ExportError::Normalize(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
                ExportError::MissingAsset { .. }
                | ExportError::Archive(_)
                | ExportError::Zip(_)
                | ExportError::Io(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Export error".to_string()),
            },
            ApiError::Validation(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            ApiError::Serialization(_) => {
                (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Convenience functions for common errors
impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn internal(msg: &str) -> Self {
        Self::Internal(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}
