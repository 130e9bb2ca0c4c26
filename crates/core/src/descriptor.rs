//! Static description of a remote collection: where it lives and how the
//! backend wraps it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::result::Result;

/// Where a resource lives and how its response is enveloped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Plural, human readable name used in messages ("servers").
    pub label: &'static str,
    /// Path relative to the API base URL.
    pub path: &'static str,
    /// Key wrapping the payload, e.g. `{"templates": [...]}`.
    pub envelope: Option<&'static str>,
}

impl ResourceDescriptor {
    pub const SERVERS: Self = Self::new("servers", "/servers/getServers", None);
    pub const TEMPLATES: Self = Self::new("templates", "/templates/getTemplates", Some("templates"));
    /// Root-mounted alias of [`Self::TEMPLATES`] served by older backends.
    pub const TEMPLATES_ROOT: Self = Self::new("templates", "/getTemplates", Some("templates"));
    pub const LOGS: Self = Self::new("logs", "/logs/getLogs", Some("logs"));
    pub const CONFIGURATIONS: Self =
        Self::new("configurations", "/configurations/getConfigs", None);
    pub const SCHEDULES: Self = Self::new("schedules", "/schedules/getSchedules", None);

    #[must_use]
    pub const fn new(label: &'static str, path: &'static str, envelope: Option<&'static str>) -> Self {
        Self {
            label,
            path,
            envelope,
        }
    }

    /// Strip the envelope when present. A bare payload passes through.
    #[must_use]
    pub fn unwrap_envelope(&self, body: Value) -> Value {
        unwrap_envelope(self.envelope, body)
    }

    /// Decode a collection response.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the payload is not a list of `T`.
    pub fn decode_list<T: DeserializeOwned>(&self, body: Value) -> Result<Vec<T>> {
        match self.unwrap_envelope(body) {
            Value::Null => Ok(Vec::new()),
            payload => serde_json::from_value(payload)
                .map_err(|e| Error::decode(self.label, e.to_string())),
        }
    }
}

/// Path of a single template, answered as `{"template": {...}}`.
#[must_use]
pub fn template_path(id: i64) -> String {
    format!("/templates/getTemplate/{id}")
}

/// Envelope key of single template responses.
pub const TEMPLATE_ENVELOPE: &str = "template";

/// Decode a single entity, accepting the wrapped and the bare shape.
///
/// # Errors
///
/// Returns `Error::Decode` if the payload is not a `T`.
pub fn decode_one<T: DeserializeOwned>(
    what: &str,
    envelope: Option<&str>,
    body: Value,
) -> Result<T> {
    serde_json::from_value(unwrap_envelope(envelope, body))
        .map_err(|e| Error::decode(what, e.to_string()))
}

fn unwrap_envelope(envelope: Option<&str>, body: Value) -> Value {
    match (envelope, body) {
        (Some(key), Value::Object(mut map)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (_, body) => body,
    }
}
