//! Server inventory records.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Secret;

/// Reachability of a managed server.
///
/// The backend stores a boolean; older payloads use `"online"`/`"offline"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServerStatus {
    Online,
    #[default]
    Offline,
}

impl ServerStatus {
    /// Lowercase label used for filtering and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Self::Online,
            Raw::Flag(false) => Self::Offline,
            Raw::Text(text) if text.eq_ignore_ascii_case("online") => Self::Online,
            Raw::Text(_) => Self::Offline,
        })
    }
}

/// Deployment environment of a server. Unknown labels are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Production,
    Staging,
    Development,
    Other(String),
}

impl Environment {
    /// Lowercase label used for filtering and display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Other(label) => label,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A managed server as returned by `GET /servers/getServers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    #[serde(alias = "ip")]
    pub ip_address: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub ssh_port: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Secret,
}

impl Server {
    /// Creates a server with minimal required fields.
    pub fn new(id: i64, name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ip_address: ip_address.into(),
            status: ServerStatus::default(),
            environment: Environment::default(),
            os: String::new(),
            ssh_port: None,
            project: None,
            username: String::new(),
            password: Secret::default(),
        }
    }

    /// Builder pattern: set status
    #[must_use]
    pub const fn with_status(mut self, status: ServerStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder pattern: set environment
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<Environment>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Builder pattern: set operating system
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Builder pattern: set terminal credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }
}

/// Payload for `POST /servers/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewServer {
    pub name: String,
    pub ip_address: String,
    pub username: String,
    pub password: Secret,
    pub ssh_port: String,
    pub environment: Environment,
    pub os: String,
    pub project: String,
    #[serde(default)]
    pub status: bool,
}
