//! Execution history records.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a playbook run. Unknown labels are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    /// Lowercase label used for filtering and display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(value: ExecutionStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution log row. `template_id` is a foreign key resolved to a
/// name client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub id: i64,
    pub template_id: i64,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub log_content: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub status: ExecutionStatus,
}

impl ExecutionLog {
    /// Creates a log row without content or timestamp.
    pub fn new(id: i64, template_id: i64, status: ExecutionStatus) -> Self {
        Self {
            id,
            template_id,
            server_name: String::new(),
            log_content: String::new(),
            timestamp: None,
            status,
        }
    }

    /// Builder pattern: set server name
    #[must_use]
    pub fn with_server(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self
    }

    /// Builder pattern: set log content
    #[must_use]
    pub fn with_content(mut self, log_content: impl Into<String>) -> Self {
        self.log_content = log_content.into();
        self
    }
}

/// Accept RFC 3339 as well as the naive timestamps the backend emits.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
