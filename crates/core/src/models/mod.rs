//! Records exchanged with the automation backend.
//!
//! These are ephemeral, unvalidated copies of backend-owned entities.

pub mod configuration;
pub mod log;
pub mod schedule;
pub mod server;
pub mod template;

pub use configuration::{Configuration, NewConfiguration};
pub use log::{ExecutionLog, ExecutionStatus};
pub use schedule::{Frequency, NewSchedule, Schedule, ScheduleStatus};
pub use server::{Environment, NewServer, Server, ServerStatus};
pub use template::{ConfigurationOrder, NewTemplate, PlaybookUpload, Template, TemplateName};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a plaintext value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the plaintext value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_secret_serializes_transparently() {
        let json = serde_json::to_string(&Secret::new("pw"));
        assert_eq!(json.ok().as_deref(), Some("\"pw\""));
    }
}
