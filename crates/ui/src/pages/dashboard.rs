//! Overview: status cards per resource and the latest executions.

use std::collections::BTreeMap;

use leptos::prelude::*;
use playdeck_core::{
    ExecutionLog, LogField, LogRow, Resource, ResourceDescriptor, Schedule, ScheduleField,
    Server, ServerField, TableModel, Template, category_counts,
};

use crate::components::ResourceTable;
use crate::hooks::use_remote_list;
use crate::pages::servers::SERVER_POLL;
use crate::router::routes;

/// Executions shown in the recent activity table.
pub const RECENT_EXECUTIONS: usize = 5;

/// Text of one status card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: String,
    pub detail: String,
}

impl Summary {
    /// Card text for a collection. Unloaded collections show a dash.
    pub fn of<T>(resource: &Resource<T>, detail: impl FnOnce(&[T]) -> String) -> Self {
        match resource {
            Resource::Loaded(items) => Self {
                total: items.len().to_string(),
                detail: detail(items),
            },
            Resource::Loading => Self {
                total: "-".to_string(),
                detail: "loading".to_string(),
            },
            Resource::Failed(_) => Self {
                total: "-".to_string(),
                detail: "unavailable".to_string(),
            },
        }
    }
}

/// `"{count} {category}"` from a count table.
pub fn count_label(counts: &BTreeMap<String, usize>, category: &str) -> String {
    format!("{} {category}", counts.get(category).copied().unwrap_or_default())
}

/// The newest executions first, template names left blank.
pub fn recent_executions(resource: &Resource<ExecutionLog>) -> Resource<LogRow> {
    match resource {
        Resource::Loading => Resource::Loading,
        Resource::Failed(e) => Resource::Failed(e.clone()),
        Resource::Loaded(logs) => {
            let mut rows = LogRow::join(logs, |_| String::new());
            rows.sort_by(|a, b| b.log.timestamp.cmp(&a.log.timestamp));
            rows.truncate(RECENT_EXECUTIONS);
            Resource::Loaded(rows)
        }
    }
}

#[component]
fn SummaryCard(title: &'static str, href: &'static str, summary: Memo<Summary>) -> impl IntoView {
    view! {
        <a class="summary-card" href=href>
            <span class="summary-label">{title}</span>
            <span class="summary-count">{move || summary.get().total}</span>
            <span class="summary-detail">{move || summary.get().detail}</span>
        </a>
    }
}

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let servers = use_remote_list::<Server>(ResourceDescriptor::SERVERS, Some(SERVER_POLL));
    let templates = use_remote_list::<Template>(ResourceDescriptor::TEMPLATES, None);
    let logs = use_remote_list::<ExecutionLog>(ResourceDescriptor::LOGS, None);
    let schedules = use_remote_list::<Schedule>(ResourceDescriptor::SCHEDULES, None);

    let server_summary = Memo::new(move |_| {
        servers.state.with(|resource| {
            Summary::of(resource, |items| {
                count_label(&category_counts(items, ServerField::Status), "online")
            })
        })
    });
    let template_summary = Memo::new(move |_| {
        templates.state.with(|resource| {
            Summary::of(resource, |items| {
                let steps: usize = items.iter().map(|t| t.configurations.len()).sum();
                format!("{steps} steps")
            })
        })
    });
    let log_summary = Memo::new(move |_| {
        logs.state.with(|resource| {
            Summary::of(resource, |items| {
                count_label(&category_counts(items, LogField::Status), "failed")
            })
        })
    });
    let schedule_summary = Memo::new(move |_| {
        schedules.state.with(|resource| {
            Summary::of(resource, |items| {
                count_label(&category_counts(items, ScheduleField::Status), "active")
            })
        })
    });
    let recent = Memo::new(move |_| {
        logs.state.with(|resource| {
            let recent = recent_executions(resource);
            TableModel::from_resource(&recent, "executions", |rows| rows.iter().collect())
        })
    });

    view! {
        <div class="dashboard-page">
            <header class="page-header">
                <h1>"Dashboard"</h1>
            </header>
            <section class="summary-cards">
                <SummaryCard title="Servers" href=routes::SERVERS summary=server_summary />
                <SummaryCard title="Templates" href=routes::TEMPLATES summary=template_summary />
                <SummaryCard title="Executions" href=routes::EXECUTIONS summary=log_summary />
                <SummaryCard title="Schedules" href=routes::SCHEDULES summary=schedule_summary />
            </section>
            <section class="recent-activity">
                <h2>"Recent Executions"</h2>
                <ResourceTable model=recent />
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use playdeck_core::Error;

    use super::*;

    #[test]
    fn test_summary_of_loaded_collection() {
        let counts: BTreeMap<String, usize> = [("online".to_string(), 2)].into();
        let resource = Resource::Loaded(vec![1, 2, 3]);
        assert_eq!(
            Summary::of(&resource, |_| count_label(&counts, "online")),
            Summary {
                total: "3".to_string(),
                detail: "2 online".to_string(),
            }
        );
        assert_eq!(count_label(&counts, "offline"), "0 offline");
    }

    #[test]
    fn test_summary_of_failed_collection() {
        let resource: Resource<i32> = Resource::Failed(Error::status("/logs/getLogs", 502));
        let summary = Summary::of(&resource, |_| String::new());
        assert_eq!(summary.total, "-");
        assert_eq!(summary.detail, "unavailable");
    }

    #[test]
    fn test_recent_executions_newest_first_and_capped() {
        let logs: Vec<ExecutionLog> = (1..=7)
            .map(|id| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "template_id": 1,
                    "timestamp": format!("2024-03-01T10:0{id}:00Z"),
                    "status": "success",
                }))
                .unwrap()
            })
            .collect();
        let recent = recent_executions(&Resource::Loaded(logs));
        let ids: Vec<i64> = recent.items().iter().map(|row| row.log.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_dashboard_component_exists() {
        let _component = Dashboard;
    }
}
