//! Foreign key to display name resolution with a per-view cache.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::join_all;
use itertools::Itertools;

use crate::descriptor::{TEMPLATE_ENVELOPE, template_path};
use crate::fetcher::fetch_entity;
use crate::models::{ExecutionLog, TemplateName};
use crate::transport::Transport;

/// Cache entry for one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEntry {
    /// Request issued, no answer yet.
    Pending,
    Resolved(String),
    /// The lookup failed. The id stays cached so it is not retried.
    Unresolved,
}

/// Resolves `template_id` references to template names.
///
/// Each id is requested at most once for the lifetime of the resolver,
/// including ids whose request is still pending.
pub struct NameResolver {
    transport: Rc<dyn Transport>,
    cache: RefCell<HashMap<i64, NameEntry>>,
    requests: Cell<usize>,
}

impl NameResolver {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: RefCell::new(HashMap::new()),
            requests: Cell::new(0),
        }
    }

    /// Resolve every id not yet in the cache, concurrently.
    ///
    /// Returns how many requests were issued.
    pub async fn resolve_all(&self, ids: impl IntoIterator<Item = i64>) -> usize {
        let fresh: Vec<i64> = {
            let cache = self.cache.borrow();
            ids.into_iter()
                .unique()
                .filter(|id| !cache.contains_key(id))
                .collect()
        };
        if fresh.is_empty() {
            return 0;
        }

        {
            let mut cache = self.cache.borrow_mut();
            for id in &fresh {
                cache.insert(*id, NameEntry::Pending);
            }
        }
        self.requests
            .set(self.requests.get().saturating_add(fresh.len()));
        tracing::debug!(ids = ?fresh, "resolving template names");

        let lookups = fresh.iter().map(|&id| async move {
            let result = fetch_entity::<TemplateName>(
                self.transport.as_ref(),
                &template_path(id),
                "template",
                Some(TEMPLATE_ENVELOPE),
            )
            .await;
            (id, result)
        });
        let results = join_all(lookups).await;

        let mut cache = self.cache.borrow_mut();
        for (id, result) in results {
            let entry = match result {
                Ok(template) => NameEntry::Resolved(template.name),
                Err(e) => {
                    tracing::warn!(template_id = id, error = %e, "template name unresolved");
                    NameEntry::Unresolved
                }
            };
            cache.insert(id, entry);
        }
        fresh.len()
    }

    /// Resolve the templates referenced by a batch of logs.
    pub async fn resolve_logs(&self, logs: &[ExecutionLog]) -> usize {
        self.resolve_all(logs.iter().map(|log| log.template_id)).await
    }

    /// Display name for `id`, empty until resolved.
    pub fn name_of(&self, id: i64) -> String {
        match self.cache.borrow().get(&id) {
            Some(NameEntry::Resolved(name)) => name.clone(),
            _ => String::new(),
        }
    }

    pub fn entry(&self, id: i64) -> Option<NameEntry> {
        self.cache.borrow().get(&id).cloned()
    }

    /// Every resolved name, keyed by id.
    pub fn snapshot(&self) -> HashMap<i64, String> {
        self.cache
            .borrow()
            .iter()
            .filter_map(|(id, entry)| match entry {
                NameEntry::Resolved(name) => Some((*id, name.clone())),
                _ => None,
            })
            .collect()
    }

    /// Total lookups issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }
}
