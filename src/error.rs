//! Error types for the accessibility scanner.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors for scan and ownership operations
//! - `ErrorResponse`: Serializable error body for boundary layers (CLI, HTTP glue)
//! - `Result<T>`: Type alias for Results using AppError

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for scan operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed URL, rejected before any network attempt
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Fetch was attempted but failed (transport, timeout, non-2xx)
    #[error("Could not fetch page: {0}")]
    FetchFailed(String),

    /// A checker blew up while inspecting the document
    #[error("Checker {checker} failed: {message}")]
    CheckerFault { checker: &'static str, message: String },

    /// Storage failure after a successful fetch
    #[error("Persistence error: {0}")]
    PersistenceFault(String),

    #[error("Scan not found: {0}")]
    ScanNotFound(i64),

    #[error("Web page not found: {0}")]
    WebPageNotFound(i64),

    /// Requesting account does not own the resource
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Scan was cancelled by the caller
    #[error("Scan cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a fetch failure
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    /// Create a persistence fault, keeping the full context chain
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::PersistenceFault(format!("{:#}", err))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// HTTP-equivalent status category for boundary layers.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::ScanNotFound(_) | Self::WebPageNotFound(_) => 404,
            Self::FetchFailed(_) => 502,
            Self::CheckerFault { .. }
            | Self::PersistenceFault(_)
            | Self::Cancelled
            | Self::Other(_) => 500,
        }
    }

    /// True for errors caused by the caller's input or identity.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// ERROR RESPONSE (FOR BOUNDARY LAYERS)
// ============================================================================

/// Serializable error body handed to whatever sits in front of the services.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            status: error.status_code(),
            error: error.to_string(),
        }
    }
}
