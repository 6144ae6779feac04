//! Error types for chanlog.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the binary wrapping all fatal failures
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing initialization failures
//!   - [`BackendError`] - HTTP backend failures
//!   - `std::io::Error` - stdin/stdout failures in the shell
//!
//! # Error Recovery Strategy
//!
//! Inside the viewer core, [`BackendError`] is **non-fatal**: the controller turns it into a
//! transient notice and keeps the view it had before the failed action. Navigation
//! boundaries are not errors at all (see [`Boundary`](crate::state::Boundary)), and the
//! inline formatter is total, so malformed formatting codes can never abort a render batch.
//! Only the binary's setup path propagates errors to `main`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The backend client could not be built or a request failed fatally.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Terminal I/O failure in the shell.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the log backend.
///
/// Every variant names the endpoint so the notice and the log line can point at
/// the request that failed.
///
/// **Recovery**: surfaced as a transient "network failure" notice with an audible cue.
/// The view stays in the state it had before the action (no partial overwrite).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request could not be sent or no response arrived (DNS, connect, timeout).
    #[error("Request to {endpoint} failed: {reason}")]
    Request {
        /// Endpoint path, e.g. `/dates`.
        endpoint: String,
        /// Transport error description.
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("Request to {endpoint} returned status {status}")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("Malformed response from {endpoint}: {reason}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Decoder error description.
        reason: String,
    },

    /// The configured backend base URL is unusable.
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error description.
        reason: String,
    },
}

impl BackendError {
    /// Endpoint the failed request targeted, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            BackendError::Request { endpoint, .. }
            | BackendError::Status { endpoint, .. }
            | BackendError::Decode { endpoint, .. } => Some(endpoint),
            BackendError::InvalidBaseUrl { .. } => None,
        }
    }
}
