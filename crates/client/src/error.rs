//! Error types for the native client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or talking to the backend.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild { reason: String },

    /// HTTP error from reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket error from tungstenite.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// URL parse error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error.
    #[error("{0}")]
    Core(#[from] playdeck_core::Error),
}

impl Error {
    /// Create a config error.
    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }
}

/// Views only see the core taxonomy.
impl From<Error> for playdeck_core::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Core(core) => core,
            Error::Http(e) => match e.status() {
                Some(status) => Self::status(
                    e.url().map_or_else(String::new, |u| u.path().to_string()),
                    status.as_u16(),
                ),
                None => Self::network_failure(e.to_string()),
            },
            Error::WebSocket(e) => Self::socket(e.to_string()),
            Error::UrlParse(e) => Self::invalid_url("", e.to_string()),
            Error::Json(e) => Self::decode("response", e.to_string()),
            Error::Io(e) => Self::network_failure(e.to_string()),
            Error::ConfigError { reason } | Error::ClientBuild { reason } => Self::config(reason),
            Error::Toml(e) => Self::config(e.to_string()),
        }
    }
}
