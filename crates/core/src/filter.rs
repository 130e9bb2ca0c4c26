//! Client side category filtering and free text search.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{ExecutionLog, Schedule, Server, Template};
use crate::render::LogRow;

/// A category selection. `all` (or an empty string) is the identity filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    /// Parse a selection label; `all` matches case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(trimmed.to_owned())
        }
    }

    /// Category equality, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.eq_ignore_ascii_case(value),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(value) => value,
        }
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that expose named category fields.
pub trait Categorized {
    type Field: Copy;

    fn category(&self, field: Self::Field) -> &str;
}

/// Records that can be matched against free text.
pub trait Searchable {
    /// Text fields considered by search.
    fn haystack(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any field. Blank needles match.
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .haystack()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerField {
    Environment,
    Status,
    Os,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogField {
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    Status,
}

impl Categorized for Server {
    type Field = ServerField;

    fn category(&self, field: ServerField) -> &str {
        match field {
            ServerField::Environment => self.environment.as_str(),
            ServerField::Status => self.status.as_str(),
            ServerField::Os => &self.os,
        }
    }
}

impl Searchable for Server {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.ip_address.as_str(), self.os.as_str()]
    }
}

impl Searchable for Template {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Categorized for ExecutionLog {
    type Field = LogField;

    fn category(&self, field: LogField) -> &str {
        match field {
            LogField::Status => self.status.as_str(),
        }
    }
}

impl Searchable for ExecutionLog {
    fn haystack(&self) -> Vec<&str> {
        vec![self.server_name.as_str(), self.log_content.as_str()]
    }
}

impl Categorized for LogRow {
    type Field = LogField;

    fn category(&self, field: LogField) -> &str {
        self.log.category(field)
    }
}

impl Searchable for LogRow {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = self.log.haystack();
        fields.push(self.template_name.as_str());
        fields
    }
}

impl Categorized for Schedule {
    type Field = ScheduleField;

    fn category(&self, field: ScheduleField) -> &str {
        match field {
            ScheduleField::Status => self.status.as_str(),
        }
    }
}

impl Searchable for Schedule {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.playbook.as_str(), self.target.as_str()]
    }
}

/// Items whose `field` equals `selection`, in original order.
pub fn filter_by<'a, T: Categorized>(
    items: &'a [T],
    field: T::Field,
    selection: &Selection,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| selection.matches(item.category(field)))
        .collect()
}

/// A category selection combined with a search needle.
#[derive(Debug, Clone)]
pub struct FilteredList<F> {
    pub field: F,
    pub selection: Selection,
    pub search: String,
}

impl<F: Copy> FilteredList<F> {
    pub fn new(field: F) -> Self {
        Self {
            field,
            selection: Selection::All,
            search: String::new(),
        }
    }

    /// Builder pattern: set selection
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Builder pattern: set search needle
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T>
    where
        T: Categorized<Field = F> + Searchable,
    {
        items
            .iter()
            .filter(|item| self.selection.matches(item.category(self.field)))
            .filter(|item| item.matches_search(&self.search))
            .collect()
    }
}

/// Number of items per category value, in label order.
pub fn category_counts<T: Categorized>(items: &[T], field: T::Field) -> BTreeMap<String, usize> {
    items.iter().fold(BTreeMap::new(), |mut counts, item| {
        let count = counts
            .entry(item.category(field).to_lowercase())
            .or_insert(0_usize);
        *count = count.saturating_add(1);
        counts
    })
}
