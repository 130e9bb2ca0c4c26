//! Mapping fetched collections to presentational rows.
//!
//! Both front ends render the same [`TableModel`]: the dashboard as an HTML
//! table, the console as aligned text.

use crate::models::{Configuration, ExecutionLog, Schedule, Server, Template};
use crate::resource::Resource;

const OUTPUT_PREVIEW_CHARS: usize = 60;

/// A record that renders as one table row.
pub trait TableRow {
    /// Index of the column rendered as a status badge.
    const STATUS_COLUMN: Option<usize> = None;

    fn headers() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    /// Stable identity used to key rows.
    fn key(&self) -> String;
}

/// What a list view shows, derived from the tri-state.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Failed(String),
    Empty(String),
    Rows(Vec<&'a T>),
}

impl<'a, T> ListView<'a, T> {
    /// Derive the view of `resource`, passing loaded items through `select`.
    ///
    /// An error shows the generic "Failed to load {label}" message; a
    /// selection that keeps nothing shows the empty state.
    pub fn from_resource<F>(resource: &'a Resource<T>, label: &str, select: F) -> Self
    where
        F: FnOnce(&'a [T]) -> Vec<&'a T>,
    {
        match resource {
            Resource::Loading => Self::Loading,
            Resource::Failed(_) => Self::Failed(format!("Failed to load {label}")),
            Resource::Loaded(items) => {
                let rows = select(items);
                if rows.is_empty() {
                    Self::Empty(format!("No {label} found"))
                } else {
                    Self::Rows(rows)
                }
            }
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    pub key: String,
    pub cells: Vec<String>,
}

/// Owned, platform neutral table state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableModel {
    #[default]
    Loading,
    Failed(String),
    Empty(String),
    Rows {
        headers: Vec<String>,
        rows: Vec<TableLine>,
        status_column: Option<usize>,
    },
}

impl TableModel {
    pub fn build<T: TableRow>(view: &ListView<'_, T>) -> Self {
        match view {
            ListView::Loading => Self::Loading,
            ListView::Failed(message) => Self::Failed(message.clone()),
            ListView::Empty(message) => Self::Empty(message.clone()),
            ListView::Rows(items) => Self::Rows {
                headers: T::headers().iter().map(ToString::to_string).collect(),
                rows: items
                    .iter()
                    .map(|item| TableLine {
                        key: item.key(),
                        cells: item.cells(),
                    })
                    .collect(),
                status_column: T::STATUS_COLUMN,
            },
        }
    }

    /// Shorthand for the common resource-to-table path.
    pub fn from_resource<'a, T, F>(resource: &'a Resource<T>, label: &str, select: F) -> Self
    where
        T: TableRow,
        F: FnOnce(&'a [T]) -> Vec<&'a T>,
    {
        Self::build(&ListView::from_resource(resource, label, select))
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows { rows, .. } => rows.len(),
            _ => 0,
        }
    }
}

/// An execution log joined with its resolved template name.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub log: ExecutionLog,
    pub template_name: String,
}

impl LogRow {
    /// Join logs with names; unresolved names stay empty.
    pub fn join(logs: &[ExecutionLog], name_of: impl Fn(i64) -> String) -> Vec<Self> {
        logs.iter()
            .map(|log| Self {
                log: log.clone(),
                template_name: name_of(log.template_id),
            })
            .collect()
    }
}

impl TableRow for Server {
    const STATUS_COLUMN: Option<usize> = Some(4);

    fn headers() -> &'static [&'static str] {
        &["Name", "IP Address", "Environment", "OS", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.ip_address.clone(),
            self.environment.to_string(),
            self.os.clone(),
            self.status.to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl TableRow for Template {
    fn headers() -> &'static [&'static str] {
        &["Name", "Description", "Steps"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.configurations.len().to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl TableRow for LogRow {
    const STATUS_COLUMN: Option<usize> = Some(2);

    fn headers() -> &'static [&'static str] {
        &["Template", "Server", "Status", "Timestamp", "Output"]
    }

    fn cells(&self) -> Vec<String> {
        let timestamp = self.log.timestamp.map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        vec![
            self.template_name.clone(),
            self.log.server_name.clone(),
            self.log.status.to_string(),
            timestamp,
            preview(&self.log.log_content),
        ]
    }

    fn key(&self) -> String {
        self.log.id.to_string()
    }
}

impl TableRow for Schedule {
    const STATUS_COLUMN: Option<usize> = Some(6);

    fn headers() -> &'static [&'static str] {
        &[
            "Name", "Playbook", "Target", "Schedule", "Last Run", "Next Run", "Status",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.playbook.clone(),
            self.target.clone(),
            self.schedule.clone(),
            self.last_run.clone(),
            self.next_run.clone(),
            self.status.to_string(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl TableRow for Configuration {
    fn headers() -> &'static [&'static str] {
        &["Name", "Module", "Configuration", "Description"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.module.clone(),
            self.configuration.clone(),
            self.description.clone(),
        ]
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// First line of an output blob, shortened.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut shortened: String = first_line.chars().take(OUTPUT_PREVIEW_CHARS).collect();
    if first_line.chars().count() > OUTPUT_PREVIEW_CHARS || content.lines().nth(1).is_some() {
        shortened.push('…');
    }
    shortened
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unreachable)]

    use super::*;
    use crate::error::Error;
    use crate::models::{ExecutionStatus, ServerStatus};

    #[test]
    fn test_empty_collection_renders_empty_state() {
        let resource: Resource<Server> = Resource::Loaded(Vec::new());
        let model = TableModel::from_resource(&resource, "servers", |items| items.iter().collect());
        assert_eq!(model, TableModel::Empty("No servers found".to_string()));
    }

    #[test]
    fn test_failure_uses_generic_message() {
        let resource: Resource<Server> = Resource::Failed(Error::status("/servers/getServers", 500));
        let model = TableModel::from_resource(&resource, "servers", |items| items.iter().collect());
        assert_eq!(model, TableModel::Failed("Failed to load servers".to_string()));
    }

    #[test]
    fn test_rows_carry_headers_and_status_column() {
        let resource = Resource::Loaded(vec![
            Server::new(9, "web-01", "10.0.0.9").with_status(ServerStatus::Online),
        ]);
        let model = TableModel::from_resource(&resource, "servers", |items| items.iter().collect());
        let TableModel::Rows {
            headers,
            rows,
            status_column,
        } = model
        else {
            unreachable!("expected rows");
        };
        assert_eq!(headers.len(), 5);
        assert_eq!(status_column, Some(4));
        assert_eq!(rows.first().map(|r| r.key.as_str()), Some("9"));
        assert_eq!(
            rows.first().and_then(|r| r.cells.get(4)).map(String::as_str),
            Some("online")
        );
    }

    #[test]
    fn test_log_row_join_keeps_unresolved_names_empty() {
        let logs = vec![
            ExecutionLog::new(1, 4, ExecutionStatus::Success),
            ExecutionLog::new(2, 5, ExecutionStatus::Failed),
        ];
        let rows = LogRow::join(&logs, |id| if id == 4 { "Backup".to_string() } else { String::new() });
        assert_eq!(rows.first().map(|r| r.template_name.as_str()), Some("Backup"));
        assert_eq!(rows.last().map(|r| r.template_name.as_str()), Some(""));
    }

    #[test]
    fn test_preview_shortens_multiline_output() {
        assert_eq!(preview("ok=3\nchanged=1"), "ok=3…");
        assert_eq!(preview("done"), "done");
    }
}
