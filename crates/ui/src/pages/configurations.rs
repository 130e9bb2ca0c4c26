//! Saved command configurations.

use leptos::prelude::*;
use playdeck_core::{
    Configuration, ModalState, Mutation, NewConfiguration, RefreshPolicy, ResourceDescriptor,
    TableModel,
};

use crate::components::{FormActions, FormField, Modal, ResourceTable};
use crate::hooks::use_remote_list;

/// Configurations page component
#[component]
pub fn Configurations() -> impl IntoView {
    let configurations =
        use_remote_list::<Configuration>(ResourceDescriptor::CONFIGURATIONS, None);
    let notice = RwSignal::new(None::<String>);
    let modal = RwSignal::new(ModalState::default());
    let name = RwSignal::new(String::new());
    let module = RwSignal::new("shell".to_string());
    let configuration = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());

    let model = Memo::new(move |_| {
        configurations.state.with(|resource| {
            TableModel::from_resource(resource, "configurations", |items| items.iter().collect())
        })
    });

    let on_delete = Callback::new(move |key: String| match key.parse::<i64>() {
        Ok(id) => configurations.dispatch(
            Mutation::DeleteConfiguration(id),
            RefreshPolicy::Refetch,
            notice,
        ),
        Err(_) => notice.set(Some(format!("Invalid configuration id {key}"))),
    });
    let close = Callback::new(move |()| modal.update(ModalState::close));
    let submit = Callback::new(move |()| {
        let mutation = Mutation::CreateConfiguration(NewConfiguration {
            name: name.get_untracked(),
            description: description.get_untracked(),
            module: module.get_untracked(),
            configuration: configuration.get_untracked(),
        });
        configurations.submit(modal, mutation, RefreshPolicy::Refetch);
    });

    view! {
        <div class="configurations-page">
            <header class="page-header">
                <h1>"Configurations"</h1>
                <button class="btn-primary" on:click=move |_| modal.update(ModalState::open)>
                    "+ New Command"
                </button>
            </header>
            <Show when=move || notice.get().is_some()>
                <p class="state-message error">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <ResourceTable model=model on_delete=on_delete />

            <Show when=move || modal.with(|m| m.open)>
                <Modal
                    title="New Command"
                    error=Signal::derive(move || modal.with(|m| m.error.clone()))
                    on_close=close
                >
                    <FormField label="Name" value=name />
                    <FormField label="Module" value=module placeholder="shell, command, apt..." />
                    <FormField label="Command" value=configuration placeholder="systemctl restart nginx" />
                    <FormField label="Description" value=description />
                    <FormActions
                        submitting=Signal::derive(move || modal.with(|m| m.submitting))
                        submit_label="Save"
                        on_submit=submit
                        on_cancel=close
                    />
                </Modal>
            </Show>
        </div>
    }
}
