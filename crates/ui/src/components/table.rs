//! Table rendering for `TableModel`.

use leptos::prelude::*;
use playdeck_core::{TableLine, TableModel};

/// CSS classes for a status cell, e.g. `status-badge status-online`.
#[must_use]
pub fn status_class(status: &str) -> String {
    format!("status-badge status-{}", status.trim().to_lowercase())
}

/// Renders the loading, failed, empty or row state of a table model.
///
/// With `link_prefix` the first cell links to `{link_prefix}{row key}`.
/// With `on_delete` every row gets a delete button that receives the key.
#[component]
pub fn ResourceTable(
    #[prop(into)] model: Signal<TableModel>,
    #[prop(optional)] link_prefix: Option<&'static str>,
    #[prop(optional)] on_delete: Option<Callback<String>>,
) -> impl IntoView {
    move || match model.get() {
        TableModel::Loading => view! { <p class="state-message">"Loading..."</p> }.into_any(),
        TableModel::Failed(message) => {
            view! { <p class="state-message error">{message}</p> }.into_any()
        }
        TableModel::Empty(message) => view! { <p class="state-message">{message}</p> }.into_any(),
        TableModel::Rows {
            headers,
            rows,
            status_column,
        } => view! {
            <table class="resource-table">
                <thead>
                    <tr>
                        {headers.into_iter().map(|header| view! { <th>{header}</th> }).collect_view()}
                        {on_delete.map(|_| view! { <th></th> })}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|line| table_row(line, status_column, link_prefix, on_delete))
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any(),
    }
}

fn table_row(
    line: TableLine,
    status_column: Option<usize>,
    link_prefix: Option<&'static str>,
    on_delete: Option<Callback<String>>,
) -> impl IntoView {
    let TableLine { key, cells } = line;
    let href = link_prefix.map(|prefix| format!("{prefix}{key}"));
    let cells = cells
        .into_iter()
        .enumerate()
        .map(|(column, cell)| match (column, href.clone()) {
            _ if status_column == Some(column) => {
                let class = status_class(&cell);
                view! { <td><span class=class>{cell}</span></td> }.into_any()
            }
            (0, Some(href)) => view! { <td><a href=href>{cell}</a></td> }.into_any(),
            _ => view! { <td>{cell}</td> }.into_any(),
        })
        .collect_view();
    let delete = on_delete.map(|callback| {
        let key = key.clone();
        view! {
            <td>
                <button class="btn-danger" on:click=move |_| callback.run(key.clone())>
                    "Delete"
                </button>
            </td>
        }
    });

    view! { <tr data-key=key>{cells}{delete}</tr> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class_is_lowercase() {
        assert_eq!(status_class("Online"), "status-badge status-online");
        assert_eq!(status_class(" failed "), "status-badge status-failed");
    }

    #[test]
    fn test_resource_table_component_exists() {
        let _component = ResourceTable;
    }
}
