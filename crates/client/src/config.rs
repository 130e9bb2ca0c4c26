//! Configuration for the native client.
//!
//! Sources, lowest precedence first: defaults, a `.toml`/`.json` file, then
//! `PLAYDECK_*` environment variables. Command line flags are applied on top
//! by the binary.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

pub const ENV_API_URL: &str = "PLAYDECK_API_URL";
pub const ENV_WS_URL: &str = "PLAYDECK_WS_URL";
pub const ENV_TIMEOUT_SECS: &str = "PLAYDECK_TIMEOUT_SECS";
pub const ENV_POLL_SECS: &str = "PLAYDECK_POLL_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the backend lives and how patiently to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the HTTP API. `http://localhost:8000` when absent.
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Base URL for terminal sockets. Derived from `base_url` when absent.
    #[serde(default)]
    pub ws_url: Option<Url>,

    /// Timeout for requests and socket opens.
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,

    /// Refresh interval for watched lists.
    #[serde(with = "optional_duration_secs", default)]
    pub poll_interval: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            ws_url: None,
            timeout: default_timeout(),
            poll_interval: None,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at `base_url`.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..Default::default()
        }
    }

    /// Set the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Defaults, then `file` when given, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// environment variable holds an invalid value.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Load configuration from environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        if path.extension().is_some_and(|e| e == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Override fields from `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns a config error naming the offending variable.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = Some(parse_url(ENV_API_URL, &url)?);
        }

        if let Some(url) = lookup(ENV_WS_URL) {
            self.ws_url = Some(parse_url(ENV_WS_URL, &url)?);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout = Duration::from_secs(parse_secs(ENV_TIMEOUT_SECS, &secs)?);
        }

        if let Some(secs) = lookup(ENV_POLL_SECS) {
            self.poll_interval = match parse_secs(ENV_POLL_SECS, &secs)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
        }

        Ok(self)
    }

    /// Base URL of the HTTP API, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns an error if the default URL fails to parse.
    pub fn api_base(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(DEFAULT_BASE_URL)?),
        }
    }

    /// Base URL for terminal sockets: `ws_url`, or the API base with its
    /// scheme swapped (`http` to `ws`, `https` to `wss`).
    ///
    /// # Errors
    ///
    /// Returns a config error if the API base is neither http nor https.
    pub fn ws_base(&self) -> Result<Url> {
        if let Some(url) = &self.ws_url {
            return Ok(url.clone());
        }
        let mut url = self.api_base()?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(Error::config_error(format!(
                    "cannot derive a WebSocket URL from scheme '{other}'"
                )));
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| Error::config_error("cannot derive a WebSocket URL"))?;
        Ok(url)
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    raw.parse()
        .map_err(|e| Error::config_error(format!("{key} is not a valid URL: {e}")))
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::config_error(format!("{key} must be a whole number of seconds")))
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Serialization helper for Duration as seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Serialization helper for an optional Duration as seconds.
mod optional_duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
    }
}
