//! Server inventory: environment and status tabs, search and registration.

use std::time::Duration;

use leptos::prelude::*;
use playdeck_core::{
    Categorized, Environment, FilteredList, ModalState, Mutation, NewServer, RefreshPolicy,
    Resource, ResourceDescriptor, Secret, Selection, Server, ServerField, TableModel,
    category_counts,
};

use crate::components::{FilterTabs, FormActions, FormField, Modal, ResourceTable, SearchBox, TabOption};
use crate::hooks::use_remote_list;
use crate::router::routes;

/// Inventory refresh interval, so status changes show without a reload.
pub const SERVER_POLL: Duration = Duration::from_secs(30);

const ENVIRONMENT_TABS: [TabOption; 4] = [
    TabOption::ALL,
    TabOption::new("production", "Production"),
    TabOption::new("staging", "Staging"),
    TabOption::new("development", "Development"),
];

const STATUS_TABS: [TabOption; 3] = [
    TabOption::ALL,
    TabOption::new("online", "Online"),
    TabOption::new("offline", "Offline"),
];

/// Servers narrowed by environment, search needle and status.
pub fn server_table(
    resource: &Resource<Server>,
    environment: &Selection,
    status: &Selection,
    search: &str,
) -> TableModel {
    TableModel::from_resource(resource, "servers", |items| {
        FilteredList::new(ServerField::Environment)
            .with_selection(environment.clone())
            .with_search(search)
            .apply(items)
            .into_iter()
            .filter(|server| status.matches(server.category(ServerField::Status)))
            .collect()
    })
}

#[derive(Clone, Copy)]
struct ServerForm {
    name: RwSignal<String>,
    ip_address: RwSignal<String>,
    username: RwSignal<String>,
    password: RwSignal<String>,
    ssh_port: RwSignal<String>,
    environment: RwSignal<String>,
    os: RwSignal<String>,
    project: RwSignal<String>,
}

impl ServerForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            ip_address: RwSignal::new(String::new()),
            username: RwSignal::new("root".to_string()),
            password: RwSignal::new(String::new()),
            ssh_port: RwSignal::new("22".to_string()),
            environment: RwSignal::new("development".to_string()),
            os: RwSignal::new(String::new()),
            project: RwSignal::new(String::new()),
        }
    }

    fn snapshot(&self) -> NewServer {
        NewServer {
            name: self.name.get_untracked(),
            ip_address: self.ip_address.get_untracked(),
            username: self.username.get_untracked(),
            password: Secret::new(self.password.get_untracked()),
            ssh_port: self.ssh_port.get_untracked(),
            environment: Environment::from(self.environment.get_untracked()),
            os: self.os.get_untracked(),
            project: self.project.get_untracked(),
            status: false,
        }
    }
}

/// Servers page component
#[component]
pub fn Servers() -> impl IntoView {
    let servers = use_remote_list::<Server>(ResourceDescriptor::SERVERS, Some(SERVER_POLL));
    let environment = RwSignal::new(Selection::All);
    let status = RwSignal::new(Selection::All);
    let search = RwSignal::new(String::new());
    let modal = RwSignal::new(ModalState::default());
    let form = ServerForm::new();

    let model = Memo::new(move |_| {
        let environment = environment.get();
        let status = status.get();
        let search = search.get();
        servers
            .state
            .with(|resource| server_table(resource, &environment, &status, &search))
    });
    let environment_counts = Signal::derive(move || {
        servers
            .state
            .with(|resource| category_counts(resource.items(), ServerField::Environment))
    });
    let status_counts = Signal::derive(move || {
        servers
            .state
            .with(|resource| category_counts(resource.items(), ServerField::Status))
    });

    let close = Callback::new(move |()| modal.update(ModalState::close));
    let submit = Callback::new(move |()| {
        servers.submit(
            modal,
            Mutation::CreateServer(form.snapshot()),
            RefreshPolicy::Refetch,
        );
    });

    view! {
        <div class="servers-page">
            <header class="page-header">
                <h1>"Servers"</h1>
                <button class="btn-primary" on:click=move |_| modal.update(ModalState::open)>
                    "+ Add Server"
                </button>
            </header>

            <section class="page-filters">
                <FilterTabs
                    options=ENVIRONMENT_TABS.to_vec()
                    selection=environment
                    counts=environment_counts
                />
                <FilterTabs options=STATUS_TABS.to_vec() selection=status counts=status_counts />
                <SearchBox value=search placeholder="Search name, IP or OS..." />
            </section>

            <ResourceTable model=model link_prefix=routes::TERMINAL_PREFIX />

            <Show when=move || modal.with(|m| m.open)>
                <Modal
                    title="Add Server"
                    error=Signal::derive(move || modal.with(|m| m.error.clone()))
                    on_close=close
                >
                    <FormField label="Name" value=form.name />
                    <FormField label="IP Address" value=form.ip_address placeholder="10.0.0.10" />
                    <FormField label="SSH Username" value=form.username />
                    <FormField label="SSH Password" value=form.password kind="password" />
                    <FormField label="SSH Port" value=form.ssh_port />
                    <FormField label="Environment" value=form.environment />
                    <FormField label="Operating System" value=form.os placeholder="Ubuntu 22.04" />
                    <FormField label="Project" value=form.project />
                    <FormActions
                        submitting=Signal::derive(move || modal.with(|m| m.submitting))
                        submit_label="Add Server"
                        on_submit=submit
                        on_cancel=close
                    />
                </Modal>
            </Show>
        </div>
    }
}
