//! Typed error handling for Billed
//!
//! Every failure in the crate maps to one [`BilledError`] category so that
//! callers (controllers, HTTP handlers, the binary) can react to the kind of
//! failure instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`StoreError`]: the bill store rejected a `list`, `create` or `update`
//! - [`SessionError`]: the persisted user session is missing or malformed
//! - [`ValidationError`]: form constraints or file extension checks failed
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ViewError`]: template rendering failures
//! - [`RequestError`]: malformed HTTP requests
//!
//! Store errors display the store's message verbatim: the Bills page shows it
//! as-is when the list cannot be fetched.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type for Billed
#[derive(Debug)]
pub enum BilledError {
    /// Bill store failures (list, upload, update)
    Store(StoreError),

    /// Session storage failures
    Session(SessionError),

    /// Form and attachment validation failures
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// Template rendering errors
    View(ViewError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for BilledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BilledError::Store(e) => write!(f, "{}", e),
            BilledError::Session(e) => write!(f, "{}", e),
            BilledError::Validation(e) => write!(f, "{}", e),
            BilledError::Config(e) => write!(f, "{}", e),
            BilledError::View(e) => write!(f, "{}", e),
            BilledError::Request(e) => write!(f, "{}", e),
            BilledError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BilledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BilledError::Store(e) => Some(e),
            BilledError::Session(e) => Some(e),
            BilledError::Validation(e) => Some(e),
            BilledError::Config(e) => Some(e),
            BilledError::View(e) => Some(e),
            BilledError::Request(e) => Some(e),
            BilledError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BilledError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BilledError::Store(e) => e.status_code(),
            BilledError::Session(_) => StatusCode::UNAUTHORIZED,
            BilledError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BilledError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BilledError::View(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BilledError::Request(e) => e.status_code(),
            BilledError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BilledError::Store(e) => e.error_code(),
            BilledError::Session(_) => "SESSION_ERROR",
            BilledError::Validation(_) => "VALIDATION_ERROR",
            BilledError::Config(_) => "CONFIG_ERROR",
            BilledError::View(_) => "VIEW_ERROR",
            BilledError::Request(e) => e.error_code(),
            BilledError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BilledError::Validation(ValidationError::InvalidFields(fields)) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            BilledError::Validation(ValidationError::FileExtension { file_name, allowed }) => {
                Some(serde_json::json!({
                    "file_name": file_name,
                    "allowed": allowed
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BilledError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors reported by a bill store
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The backend answered with an error status; the message is shown verbatim
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No bill or upload matches the selector
    #[error("Bill '{selector}' not found")]
    NotFound { selector: String },

    /// The store could not be reached
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Error carrying the conventional "Erreur {status}" message
    pub fn http(status: u16) -> Self {
        StoreError::Status {
            status,
            message: format!("Erreur {}", status),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Status { .. } => "STORE_REJECTED",
            StoreError::NotFound { .. } => "BILL_NOT_FOUND",
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }
}

impl From<StoreError> for BilledError {
    fn from(err: StoreError) -> Self {
        BilledError::Store(err)
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors related to the persisted user session
#[derive(Debug, Error)]
pub enum SessionError {
    /// No user is stored under the session key
    #[error("No user session stored under '{key}'")]
    Missing { key: String },

    /// The stored user could not be decoded
    #[error("Malformed user session: {message}")]
    Malformed { message: String },
}

impl From<SessionError> for BilledError {
    fn from(err: SessionError) -> Self {
        BilledError::Session(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to form and attachment validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields fail their native constraints
    #[error("Invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    /// The attachment extension is not in the allow-list
    #[error("File '{file_name}' has an unsupported extension (allowed: {})", .allowed.join(", "))]
    FileExtension {
        file_name: String,
        allowed: Vec<String>,
    },

    /// Submit was attempted without a staged attachment
    #[error("No attachment staged for upload")]
    MissingFile,
}

impl From<ValidationError> for BilledError {
    fn from(err: ValidationError) -> Self {
        BilledError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A value is out of its accepted range or format
    #[error("Invalid configuration: {message}")]
    InvalidValue { message: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<ConfigError> for BilledError {
    fn from(err: ConfigError) -> Self {
        BilledError::Config(err)
    }
}

// =============================================================================
// View Errors
// =============================================================================

/// Errors raised while rendering a page
#[derive(Debug, Error)]
pub enum ViewError {
    /// Template registration or rendering failed
    #[error("Failed to render '{template}': {message}")]
    Render { template: String, message: String },
}

impl From<ViewError> for BilledError {
    fn from(err: ViewError) -> Self {
        BilledError::View(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Missing query parameter
    #[error("Missing query parameter: {name}")]
    MissingParameter { name: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::MissingParameter { .. } => "MISSING_PARAMETER",
        }
    }
}

impl From<RequestError> for BilledError {
    fn from(err: RequestError) -> Self {
        BilledError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<axum::extract::multipart::MultipartError> for BilledError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        BilledError::Request(RequestError::InvalidBody {
            message: err.body_text(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for Billed operations
pub type BilledResult<T> = Result<T, BilledError>;
