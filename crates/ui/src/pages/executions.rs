//! Execution history with template names resolved per unique id.

use std::collections::HashMap;

use leptos::prelude::*;
use playdeck_core::{
    ExecutionLog, FilteredList, LogField, LogRow, Resource, ResourceDescriptor, Selection,
    TableModel, category_counts,
};
use wasm_bindgen_futures::spawn_local;

use crate::components::{FilterTabs, ResourceTable, SearchBox, TabOption};
use crate::hooks::{use_name_resolver, use_remote_list};

const STATUS_TABS: [TabOption; 3] = [
    TabOption::ALL,
    TabOption::new("success", "Success"),
    TabOption::new("failed", "Failed"),
];

/// Join logs to resolved names, then filter by status and search.
///
/// Rows whose template is not resolved yet show an empty name.
pub fn log_table(
    resource: &Resource<ExecutionLog>,
    names: &HashMap<i64, String>,
    status: &Selection,
    search: &str,
) -> TableModel {
    let joined: Resource<LogRow> = match resource {
        Resource::Loading => Resource::Loading,
        Resource::Failed(e) => Resource::Failed(e.clone()),
        Resource::Loaded(logs) => Resource::Loaded(LogRow::join(logs, |id| {
            names.get(&id).cloned().unwrap_or_default()
        })),
    };
    TableModel::from_resource(&joined, "logs", |rows| {
        FilteredList::new(LogField::Status)
            .with_selection(status.clone())
            .with_search(search)
            .apply(rows)
    })
}

/// Executions page component
#[component]
pub fn Executions() -> impl IntoView {
    let logs = use_remote_list::<ExecutionLog>(ResourceDescriptor::LOGS, None);
    let resolver = use_name_resolver();
    let names = RwSignal::new(HashMap::<i64, String>::new());
    let status = RwSignal::new(Selection::All);
    let search = RwSignal::new(String::new());

    // Resolve names whenever a new batch of logs lands; the resolver skips
    // ids it has already seen.
    Effect::new(move |_| {
        let loaded = logs.state.with(|resource| resource.items().to_vec());
        if loaded.is_empty() {
            return;
        }
        let Some(resolver) = resolver.try_get_value() else {
            return;
        };
        spawn_local(async move {
            if resolver.resolve_logs(&loaded).await > 0 {
                names.try_set(resolver.snapshot());
            }
        });
    });

    let model = Memo::new(move |_| {
        let status = status.get();
        let search = search.get();
        names.with(|names| {
            logs.state
                .with(|resource| log_table(resource, names, &status, &search))
        })
    });
    let counts = Signal::derive(move || {
        logs.state
            .with(|resource| category_counts(resource.items(), LogField::Status))
    });

    view! {
        <div class="executions-page">
            <header class="page-header">
                <h1>"Execution History"</h1>
            </header>
            <section class="page-filters">
                <FilterTabs options=STATUS_TABS.to_vec() selection=status counts=counts />
                <SearchBox value=search placeholder="Search template, server or output..." />
            </section>
            <ResourceTable model=model />
        </div>
    }
}
