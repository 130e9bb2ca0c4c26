//! Playbook templates and their ordered configuration steps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Configuration;

/// A playbook template. Configurations are kept untyped; see
/// [`Template::ordered_steps`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub configurations: Vec<Value>,
}

impl Template {
    /// Creates a template with no configurations.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            configurations: Vec::new(),
        }
    }

    /// Builder pattern: set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Configuration steps that match the `{position, configuration}` shape,
    /// sorted by position. Entries of any other shape are skipped.
    #[must_use]
    pub fn ordered_steps(&self) -> Vec<ConfigurationOrder> {
        let mut steps: Vec<ConfigurationOrder> = self
            .configurations
            .iter()
            .filter_map(|raw| serde_json::from_value(raw.clone()).ok())
            .collect();
        steps.sort_by_key(|step| step.position);
        steps
    }
}

/// The minimal shape needed to label a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateName {
    pub name: String,
}

/// One positioned step of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationOrder {
    pub position: u32,
    pub configuration: Configuration,
}

/// Payload for `POST /templates/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub configurations: Vec<ConfigurationOrder>,
}

impl NewTemplate {
    /// Build a template from configurations in the order given; positions
    /// start at 1.
    pub fn from_configurations(
        name: impl Into<String>,
        description: impl Into<String>,
        configurations: impl IntoIterator<Item = Configuration>,
    ) -> Self {
        let configurations = (1u32..)
            .zip(configurations)
            .map(|(position, configuration)| ConfigurationOrder {
                position,
                configuration,
            })
            .collect();
        Self {
            name: name.into(),
            description: description.into(),
            configurations,
        }
    }
}

/// Payload for `POST /templates/upload`: a YAML playbook file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookUpload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub file_name: String,
    pub content: String,
}

impl PlaybookUpload {
    /// Whether the file name carries a YAML extension.
    #[must_use]
    pub fn has_yaml_extension(&self) -> bool {
        let lower = self.file_name.to_ascii_lowercase();
        lower.ends_with(".yml") || lower.ends_with(".yaml")
    }
}
