//! Error taxonomy for remote resource views.
//!
//! Every variant is `Clone + PartialEq` so a failure can live inside view
//! state (`Resource::Failed`) and be compared in tests. An empty collection
//! is not an error; it renders as an empty state.

use thiserror::Error;

/// Core error type for Playdeck operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Transport errors
    #[error("network failure: {reason}")]
    NetworkFailure { reason: String },

    #[error("request to '{path}' returned status {status}")]
    Status { path: String, status: u16 },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("request aborted")]
    Aborted,

    // Socket errors
    #[error("failed to connect to '{url}': {reason}")]
    ConnectFailed { url: String, reason: String },

    #[error("socket closed")]
    SocketClosed,

    #[error("socket error: {reason}")]
    Socket { reason: String },

    // Input errors
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl Error {
    /// Create a network failure error.
    pub fn network_failure(reason: impl Into<String>) -> Self {
        Self::NetworkFailure {
            reason: reason.into(),
        }
    }

    /// Create a non-2xx status error.
    pub fn status(path: impl Into<String>, status: u16) -> Self {
        Self::Status {
            path: path.into(),
            status,
        }
    }

    /// Create a decode error.
    pub fn decode(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a connection failure error.
    pub fn connect_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a socket error.
    pub fn socket(reason: impl Into<String>) -> Self {
        Self::Socket {
            reason: reason.into(),
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether the failure came from the network layer (rejected or non-2xx).
    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. } | Self::Status { .. })
    }
}
