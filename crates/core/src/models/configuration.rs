//! Saved commands (a module plus its arguments).

use serde::{Deserialize, Serialize};

/// A saved configuration as returned by `GET /configurations/getConfigs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub configuration: String,
}

/// Payload for `POST /configurations/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConfiguration {
    pub name: String,
    pub description: String,
    pub module: String,
    pub configuration: String,
}
