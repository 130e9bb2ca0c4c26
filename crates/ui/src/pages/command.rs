//! Ad hoc command execution on selected servers.

use leptos::prelude::*;
use playdeck_core::{
    CommandRequest, Configuration, ModalState, Mutation, ResourceDescriptor, Server,
};
use serde_json::Value;

use crate::hooks::{submit_modal, use_remote_list};

/// Text shown for an execution response.
#[must_use]
pub fn describe_response(value: &Value) -> String {
    match value {
        Value::Null => "Command accepted.".to_string(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Command page component
#[component]
pub fn Command() -> impl IntoView {
    let servers = use_remote_list::<Server>(ResourceDescriptor::SERVERS, None);
    let saved = use_remote_list::<Configuration>(ResourceDescriptor::CONFIGURATIONS, None);
    let selected = RwSignal::new(Vec::<i64>::new());
    let command = RwSignal::new(String::new());
    let response = RwSignal::new(None::<String>);
    // The form is a permanently open dialog: ModalState still guards double
    // submits and carries the error.
    let form = RwSignal::new(ModalState {
        open: true,
        ..ModalState::default()
    });

    let run = move |_| {
        let request = CommandRequest {
            server_ids: selected.get_untracked(),
            command: command.get_untracked(),
        };
        response.set(None);
        submit_modal(form, Mutation::ExecuteCommand(request), move |value| {
            response.try_set(Some(describe_response(&value)));
            form.try_update(ModalState::open);
        });
    };

    view! {
        <div class="command-page">
            <header class="page-header">
                <h1>"Run Command"</h1>
            </header>

            <section class="command-targets">
                <h2>"Servers"</h2>
                {move || {
                    servers
                        .state
                        .with(|resource| {
                            if resource.is_loading() {
                                return view! { <p class="state-message">"Loading..."</p> }.into_any();
                            }
                            if resource.error().is_some() {
                                return view! { <p class="state-message error">"Failed to load servers"</p> }
                                    .into_any();
                            }
                            resource
                                .items()
                                .iter()
                                .map(|server| {
                                    let id = server.id;
                                    let label = format!("{} ({})", server.name, server.ip_address);
                                    view! {
                                        <label class="checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selected.with(|ids| ids.contains(&id))
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    selected.update(|ids| {
                                                        ids.retain(|s| *s != id);
                                                        if checked {
                                                            ids.push(id);
                                                        }
                                                    });
                                                }
                                            />
                                            {label}
                                        </label>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        })
                }}
            </section>

            <section class="command-input">
                <label class="form-group">
                    <span>"Command"</span>
                    <input
                        type="text"
                        placeholder="uptime"
                        prop:value=move || command.get()
                        on:input=move |ev| command.set(event_target_value(&ev))
                    />
                </label>
                <div class="saved-commands">
                    {move || {
                        saved
                            .state
                            .with(|resource| resource.items().to_vec())
                            .into_iter()
                            .map(|config| {
                                let line = config.configuration.clone();
                                view! {
                                    <button class="btn-link" on:click=move |_| command.set(line.clone())>
                                        {config.name}
                                    </button>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <button
                    class="btn-primary"
                    disabled=move || form.with(|f| f.submitting)
                    on:click=run
                >
                    {move || if form.with(|f| f.submitting) { "Running..." } else { "Execute" }}
                </button>
            </section>

            <Show when=move || form.with(|f| f.error.is_some())>
                <p class="state-message error">
                    {move || form.with(|f| f.error.clone().unwrap_or_default())}
                </p>
            </Show>
            <Show when=move || response.get().is_some()>
                <pre class="command-output">{move || response.get().unwrap_or_default()}</pre>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_response_variants() {
        assert_eq!(describe_response(&Value::Null), "Command accepted.");
        assert_eq!(describe_response(&Value::String("ok".to_string())), "ok");
        assert!(describe_response(&serde_json::json!({"results": [1]})).contains("\"results\""));
    }

    #[test]
    fn test_command_component_exists() {
        let _component = Command;
    }
}
