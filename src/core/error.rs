//! Typed error handling for facture operations
//!
//! # Error Categories
//!
//! - [`ValidationError`]: form input rejected before any backend call
//! - [`FactureError::NotFound`]: no document with the requested identifier
//! - [`FactureError::Backend`]: the document database refused or failed a call
//! - [`FactureError::Config`]: configuration could not be loaded
//! - [`FactureError::Render`]: a page template failed
//!
//! Workflows surface validation errors to the user and only log the others.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Main error type of the crate
#[derive(Debug)]
pub enum FactureError {
    /// Form input rejected
    Validation(ValidationError),

    /// No document with this identifier
    NotFound { id: String },

    /// A backend call failed
    Backend { operation: String, message: String },

    /// Configuration could not be loaded or parsed
    Config(String),

    /// A template failed to render
    Render(String),
}

impl fmt::Display for FactureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactureError::Validation(e) => write!(f, "{}", e),
            FactureError::NotFound { id } => write!(f, "facture with id '{}' not found", id),
            FactureError::Backend { operation, message } => {
                write!(f, "backend {} failed: {}", operation, message)
            }
            FactureError::Config(msg) => write!(f, "configuration error: {}", msg),
            FactureError::Render(msg) => write!(f, "render error: {}", msg),
        }
    }
}

impl std::error::Error for FactureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FactureError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl FactureError {
    /// Wrap a failed backend call
    pub fn backend(operation: &str, err: anyhow::Error) -> Self {
        FactureError::Backend {
            operation: operation.to_string(),
            message: format!("{:#}", err),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            FactureError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FactureError::NotFound { .. } => StatusCode::NOT_FOUND,
            FactureError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            FactureError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FactureError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FactureError::Validation(e) => e.error_code(),
            FactureError::NotFound { .. } => "FACTURE_NOT_FOUND",
            FactureError::Backend { .. } => "BACKEND_ERROR",
            FactureError::Config(_) => "CONFIG_ERROR",
            FactureError::Render(_) => "RENDER_ERROR",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FactureError::Validation(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            FactureError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            FactureError::Validation(ValidationError::Required { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for FactureError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_response())).into_response()
    }
}

impl From<ValidationError> for FactureError {
    fn from(err: ValidationError) -> Self {
        FactureError::Validation(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a submitted form is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    Required { field: String },

    /// The status selector still shows its placeholder option
    PlaceholderStatus,

    /// The edit form carries no facture identifier
    MissingIdentifier,

    /// The identifier cannot name a document
    InvalidIdentifier { id: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => write!(f, "field '{}' is required", field),
            ValidationError::PlaceholderStatus => write!(f, "a status must be selected"),
            ValidationError::MissingIdentifier => write!(f, "no facture selected for editing"),
            ValidationError::InvalidIdentifier { id } => {
                write!(f, "'{}' is not a valid document identifier", id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "FIELD_REQUIRED",
            ValidationError::PlaceholderStatus => "STATUS_NOT_SELECTED",
            ValidationError::MissingIdentifier => "MISSING_IDENTIFIER",
            ValidationError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
        }
    }
}
