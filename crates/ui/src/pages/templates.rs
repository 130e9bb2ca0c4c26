//! Playbook templates: search, upload, creation from saved commands and
//! deletion.

use leptos::prelude::*;
use playdeck_core::{
    Configuration, ModalState, Mutation, NewTemplate, PlaybookUpload, RefreshPolicy, Resource,
    ResourceDescriptor, Searchable, Template, TableModel,
};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlInputElement;

use crate::components::{FormActions, FormField, Modal, ResourceTable, SearchBox};
use crate::hooks::use_remote_list;

/// Templates matching the search needle.
pub fn template_table(resource: &Resource<Template>, search: &str) -> TableModel {
    TableModel::from_resource(resource, "templates", |items| {
        items
            .iter()
            .filter(|template| template.matches_search(search))
            .collect()
    })
}

/// Configurations picked by id, in the order they were ticked.
pub fn picked_configurations(all: &[Configuration], picked: &[i64]) -> Vec<Configuration> {
    picked
        .iter()
        .filter_map(|id| all.iter().find(|config| config.id == *id).cloned())
        .collect()
}

/// A playbook file read in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct PickedFile {
    name: String,
    content: String,
}

/// Templates page component
#[component]
pub fn Templates() -> impl IntoView {
    let templates = use_remote_list::<Template>(ResourceDescriptor::TEMPLATES, None);
    let configurations =
        use_remote_list::<Configuration>(ResourceDescriptor::CONFIGURATIONS, None);
    let search = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);

    let model = Memo::new(move |_| {
        let search = search.get();
        templates
            .state
            .with(|resource| template_table(resource, &search))
    });

    let on_delete = Callback::new(move |key: String| match key.parse::<i64>() {
        Ok(id) => templates.dispatch(Mutation::DeleteTemplate(id), RefreshPolicy::Refetch, notice),
        Err(_) => notice.set(Some(format!("Invalid template id {key}"))),
    });

    // Upload dialog
    let upload = RwSignal::new(ModalState::default());
    let upload_name = RwSignal::new(String::new());
    let upload_description = RwSignal::new(String::new());
    let file = RwSignal::new(None::<PickedFile>);
    let close_upload = Callback::new(move |()| {
        upload.update(ModalState::close);
        file.set(None);
    });
    let submit_upload = Callback::new(move |()| {
        let picked = file.get_untracked().unwrap_or_default();
        let mutation = Mutation::UploadPlaybook(PlaybookUpload {
            name: upload_name.get_untracked(),
            description: upload_description.get_untracked(),
            file_name: picked.name,
            content: picked.content,
        });
        templates.submit(upload, mutation, RefreshPolicy::Refetch);
    });
    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        let Some(picked) = input.files().and_then(|files| files.get(0)) else {
            file.set(None);
            return;
        };
        let name = picked.name();
        spawn_local(async move {
            match JsFuture::from(picked.text()).await {
                Ok(text) => {
                    file.try_set(Some(PickedFile {
                        name,
                        content: text.as_string().unwrap_or_default(),
                    }));
                }
                Err(e) => {
                    web_sys::console::error_1(&e);
                    upload.try_update(|state| {
                        state.error = Some(format!("Could not read {name}"));
                    });
                }
            }
        });
    };

    // Create-from-commands dialog
    let create = RwSignal::new(ModalState::default());
    let create_name = RwSignal::new(String::new());
    let create_description = RwSignal::new(String::new());
    let picked = RwSignal::new(Vec::<i64>::new());
    let close_create = Callback::new(move |()| {
        create.update(ModalState::close);
        picked.set(Vec::new());
    });
    let submit_create = Callback::new(move |()| {
        let steps = configurations.state.with_untracked(|resource| {
            picked.with_untracked(|ids| picked_configurations(resource.items(), ids))
        });
        let mutation = Mutation::CreateTemplate(NewTemplate::from_configurations(
            create_name.get_untracked(),
            create_description.get_untracked(),
            steps,
        ));
        templates.submit(create, mutation, RefreshPolicy::Refetch);
    });

    view! {
        <div class="templates-page">
            <header class="page-header">
                <h1>"Templates"</h1>
                <div class="header-actions">
                    <button class="btn-secondary" on:click=move |_| create.update(ModalState::open)>
                        "+ New Template"
                    </button>
                    <button class="btn-primary" on:click=move |_| upload.update(ModalState::open)>
                        "Upload Playbook"
                    </button>
                </div>
            </header>

            <section class="page-filters">
                <SearchBox value=search placeholder="Search templates..." />
            </section>
            <Show when=move || notice.get().is_some()>
                <p class="state-message error">{move || notice.get().unwrap_or_default()}</p>
            </Show>

            <ResourceTable model=model on_delete=on_delete />

            <Show when=move || upload.with(|m| m.open)>
                <Modal
                    title="Upload Playbook"
                    error=Signal::derive(move || upload.with(|m| m.error.clone()))
                    on_close=close_upload
                >
                    <FormField label="Name" value=upload_name />
                    <FormField label="Description" value=upload_description />
                    <label class="form-group">
                        <span>"Playbook (.yml, .yaml)"</span>
                        <input type="file" accept=".yml,.yaml" on:change=on_file />
                    </label>
                    <p class="form-hint">
                        {move || file.with(|f| f.as_ref().map(|f| f.name.clone()).unwrap_or_default())}
                    </p>
                    <FormActions
                        submitting=Signal::derive(move || upload.with(|m| m.submitting))
                        submit_label="Upload"
                        on_submit=submit_upload
                        on_cancel=close_upload
                    />
                </Modal>
            </Show>

            <Show when=move || create.with(|m| m.open)>
                <Modal
                    title="New Template"
                    error=Signal::derive(move || create.with(|m| m.error.clone()))
                    on_close=close_create
                >
                    <FormField label="Name" value=create_name />
                    <FormField label="Description" value=create_description />
                    <fieldset class="form-group">
                        <legend>"Steps, in execution order"</legend>
                        {move || {
                            configurations
                                .state
                                .with(|resource| resource.items().to_vec())
                                .into_iter()
                                .map(|config| {
                                    let id = config.id;
                                    let position = move || {
                                        picked.with(|ids| {
                                            ids.iter()
                                                .position(|p| *p == id)
                                                .map(|i| format!("#{}", i.saturating_add(1)))
                                                .unwrap_or_default()
                                        })
                                    };
                                    view! {
                                        <label class="checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || picked.with(|ids| ids.contains(&id))
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    picked.update(|ids| {
                                                        ids.retain(|p| *p != id);
                                                        if checked {
                                                            ids.push(id);
                                                        }
                                                    });
                                                }
                                            />
                                            {format!("{} ({})", config.name, config.module)}
                                            <span class="step-position">{position}</span>
                                        </label>
                                    }
                                })
                                .collect_view()
                        }}
                    </fieldset>
                    <FormActions
                        submitting=Signal::derive(move || create.with(|m| m.submitting))
                        submit_label="Create"
                        on_submit=submit_create
                        on_cancel=close_create
                    />
                </Modal>
            </Show>
        </div>
    }
}
