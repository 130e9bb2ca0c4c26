//! Interactive terminal on one server.
//!
//! One [`LiveStreamView`] per mounted page, owned by a local task. The page
//! talks to it through a command channel and tears it down on unmount.

use futures::channel::mpsc::{self, UnboundedSender};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use playdeck_core::{
    CONNECTION_CLOSED_MARKER, LiveStreamView, ResourceDescriptor, SendOutcome, Server,
    StreamCommand, StreamEvent, StreamState, TeardownHandle, TerminalTarget,
};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::hooks::use_remote_list;
use crate::socket::{BrowserConnector, BrowserSocket};

/// Handles to a running session.
#[derive(Clone)]
struct Session {
    commands: UnboundedSender<StreamCommand>,
    teardown: TeardownHandle,
}

impl Session {
    fn close(&self) {
        self.teardown.request();
        let _ = self.commands.unbounded_send(StreamCommand::Close);
    }
}

/// Notice for a rejected send, `None` when nothing needs saying.
#[must_use]
pub fn rejection_notice(outcome: &SendOutcome) -> Option<String> {
    match outcome {
        SendOutcome::Sent | SendOutcome::EmptyInput => None,
        SendOutcome::NotOpen => Some("Terminal is not connected".to_string()),
        SendOutcome::Failed(e) => Some(format!("Send failed: {e}")),
    }
}

/// Terminal page component
#[component]
pub fn Terminal() -> impl IntoView {
    let params = use_params_map();
    let server_id =
        Memo::new(move |_| params.with(|p| p.get("id").and_then(|id| id.parse::<i64>().ok())));
    let servers = use_remote_list::<Server>(ResourceDescriptor::SERVERS, None);

    let output = RwSignal::new(String::new());
    let state = RwSignal::new(StreamState::Disconnected);
    let input = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);
    let session = StoredValue::new(None::<Session>);

    let server = Memo::new(move |_| {
        let id = server_id.get()?;
        servers
            .state
            .with(|resource| resource.items().iter().find(|s| s.id == id).cloned())
    });

    // Connect once, as soon as the server record is known.
    Effect::new(move |_| {
        let Some(server) = server.get() else {
            return;
        };
        if session.with_value(Option::is_some) {
            return;
        }
        let target = TerminalTarget::from(&server);
        let mut view = LiveStreamView::<BrowserSocket>::new();
        let (commands, receiver) = mpsc::unbounded();
        session.set_value(Some(Session {
            commands,
            teardown: view.teardown_handle(),
        }));
        state.set(StreamState::Connecting);

        spawn_local(async move {
            let reached = view.connect(&BrowserConnector, &target, &api::ws_base()).await;
            state.try_set(reached);
            if reached != StreamState::Open {
                output.try_set(view.output().to_string());
                notice.try_set(view.last_error().map(|e| e.to_string()));
                return;
            }
            web_sys::console::log_1(&format!("Terminal open on {}", target.server_ip).into());

            view.run(receiver, |event| match event {
                StreamEvent::Opened => {
                    state.try_set(StreamState::Open);
                }
                StreamEvent::Output(text) => {
                    output.try_update(|buffer| buffer.push_str(text));
                }
                StreamEvent::Sent(_) => {
                    input.try_set(String::new());
                    notice.try_set(None);
                }
                StreamEvent::Rejected(outcome) => {
                    notice.try_set(rejection_notice(outcome));
                }
                StreamEvent::Closed => {
                    output.try_update(|buffer| buffer.push_str(CONNECTION_CLOSED_MARKER));
                    state.try_set(StreamState::Closed);
                }
            })
            .await;

            if let Some(e) = view.last_error() {
                notice.try_set(Some(e.to_string()));
            }
            web_sys::console::log_1(&"Terminal session ended".into());
        });
    });

    on_cleanup(move || {
        session.try_with_value(|session| {
            if let Some(session) = session {
                session.close();
            }
        });
    });

    let send = move || {
        if state.get_untracked() != StreamState::Open {
            notice.set(rejection_notice(&SendOutcome::NotOpen));
            return;
        }
        let line = input.get_untracked();
        session.with_value(|session| {
            if let Some(session) = session {
                let _ = session.commands.unbounded_send(StreamCommand::Input(line));
            }
        });
    };

    let title = move || {
        server.with(|server| match server {
            Some(server) => format!("{} ({})", server.name, server.ip_address),
            None if server_id.get().is_none() => "Unknown server".to_string(),
            None => "Terminal".to_string(),
        })
    };

    view! {
        <div class="terminal-page">
            <header class="page-header">
                <h1>{title}</h1>
                <span class="terminal-state">{move || state.get().to_string()}</span>
            </header>
            <Show when=move || notice.get().is_some()>
                <p class="state-message error">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <pre class="terminal-output">{move || output.get()}</pre>
            <div class="terminal-input">
                <input
                    type="text"
                    placeholder="Type a command and press Enter"
                    disabled=move || state.get() != StreamState::Open
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            send();
                        }
                    }
                />
                <button
                    class="btn-primary"
                    disabled=move || state.get() != StreamState::Open
                    on:click=move |_| send()
                >
                    "Send"
                </button>
                <button
                    class="btn-secondary"
                    disabled=move || state.get() != StreamState::Open
                    on:click=move |_| {
                        session.with_value(|session| {
                            if let Some(session) = session {
                                session.close();
                            }
                        });
                    }
                >
                    "Disconnect"
                </button>
            </div>
        </div>
    }
}
