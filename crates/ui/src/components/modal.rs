//! Modal dialog shell.

use leptos::prelude::*;

/// Overlay dialog. Clicking the overlay or the close button runs `on_close`.
#[component]
pub fn Modal(
    title: &'static str,
    #[prop(into)] error: Signal<Option<String>>,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal-content" on:click=|e| e.stop_propagation()>
                <header class="modal-header">
                    <h2>{title}</h2>
                    <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                </header>
                <Show when=move || error.get().is_some()>
                    <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}

/// Labelled text input bound to a string signal.
#[component]
pub fn FormField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <label class="form-group">
            <span>{label}</span>
            <input
                type=kind
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

/// Submit and cancel buttons for a modal form.
#[component]
pub fn FormActions(
    #[prop(into)] submitting: Signal<bool>,
    submit_label: &'static str,
    on_submit: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-actions">
            <button class="btn-secondary" on:click=move |_| on_cancel.run(())>"Cancel"</button>
            <button
                class="btn-primary"
                disabled=move || submitting.get()
                on:click=move |_| on_submit.run(())
            >
                {move || if submitting.get() { "Submitting..." } else { submit_label }}
            </button>
        </div>
    }
}
