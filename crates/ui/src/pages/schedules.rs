//! Recurring playbook schedules.

use leptos::prelude::*;
use playdeck_core::{
    Frequency, ModalState, Mutation, NewSchedule, RefreshPolicy, Resource, ResourceDescriptor,
    Schedule, ScheduleField, ScheduleStatus, Selection, TableModel, Template, category_counts,
    filter_by,
};

use crate::components::{FilterTabs, FormActions, FormField, Modal, ResourceTable, TabOption};
use crate::hooks::use_remote_list;

const STATUS_TABS: [TabOption; 3] = [
    TabOption::ALL,
    TabOption::new("active", "Active"),
    TabOption::new("paused", "Paused"),
];

const WEEKDAY_OPTIONS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn schedule_table(resource: &Resource<Schedule>, status: &Selection) -> TableModel {
    TableModel::from_resource(resource, "schedules", |items| {
        filter_by(items, ScheduleField::Status, status)
    })
}

#[derive(Clone, Copy)]
struct ScheduleForm {
    name: RwSignal<String>,
    playbook: RwSignal<String>,
    target: RwSignal<String>,
    frequency: RwSignal<Frequency>,
    time: RwSignal<String>,
    day_of_week: RwSignal<u8>,
    day_of_month: RwSignal<String>,
    paused: RwSignal<bool>,
}

impl ScheduleForm {
    fn new() -> Self {
        let defaults = NewSchedule::default();
        Self {
            name: RwSignal::new(defaults.name),
            playbook: RwSignal::new(defaults.playbook),
            target: RwSignal::new(defaults.target),
            frequency: RwSignal::new(defaults.frequency),
            time: RwSignal::new(defaults.time),
            day_of_week: RwSignal::new(defaults.day_of_week),
            day_of_month: RwSignal::new(defaults.day_of_month.to_string()),
            paused: RwSignal::new(false),
        }
    }

    /// Current form contents. An unparsable day of month becomes 0 and is
    /// rejected by validation.
    fn request(&self) -> NewSchedule {
        NewSchedule {
            name: self.name.get(),
            playbook: self.playbook.get(),
            target: self.target.get(),
            frequency: self.frequency.get(),
            time: self.time.get(),
            day_of_week: self.day_of_week.get(),
            day_of_month: self.day_of_month.get().trim().parse().unwrap_or_default(),
            status: if self.paused.get() {
                ScheduleStatus::Paused
            } else {
                ScheduleStatus::Active
            },
            schedule: String::new(),
        }
    }
}

/// Schedules page component
#[component]
pub fn Schedules() -> impl IntoView {
    let schedules = use_remote_list::<Schedule>(ResourceDescriptor::SCHEDULES, None);
    let templates = use_remote_list::<Template>(ResourceDescriptor::TEMPLATES, None);
    let status = RwSignal::new(Selection::All);
    let modal = RwSignal::new(ModalState::default());
    let form = ScheduleForm::new();

    let model = Memo::new(move |_| {
        let status = status.get();
        schedules
            .state
            .with(|resource| schedule_table(resource, &status))
    });
    let counts = Signal::derive(move || {
        schedules
            .state
            .with(|resource| category_counts(resource.items(), ScheduleField::Status))
    });
    let preview = Memo::new(move |_| {
        let request = form.request();
        match request.validate() {
            Ok(()) => request.describe(),
            Err(e) => e.to_string(),
        }
    });

    let close = Callback::new(move |()| modal.update(ModalState::close));
    let submit = Callback::new(move |()| {
        let request = untrack(move || form.request());
        schedules.submit(modal, Mutation::CreateSchedule(request), RefreshPolicy::Refetch);
    });

    view! {
        <div class="schedules-page">
            <header class="page-header">
                <h1>"Schedules"</h1>
                <button class="btn-primary" on:click=move |_| modal.update(ModalState::open)>
                    "+ New Schedule"
                </button>
            </header>
            <section class="page-filters">
                <FilterTabs options=STATUS_TABS.to_vec() selection=status counts=counts />
            </section>
            <ResourceTable model=model />

            <Show when=move || modal.with(|m| m.open)>
                <Modal
                    title="New Schedule"
                    error=Signal::derive(move || modal.with(|m| m.error.clone()))
                    on_close=close
                >
                    <FormField label="Name" value=form.name />
                    <label class="form-group">
                        <span>"Playbook"</span>
                        <select on:change=move |ev| form.playbook.set(event_target_value(&ev))>
                            <option value="">"Select a playbook"</option>
                            {move || {
                                templates
                                    .state
                                    .with(|resource| {
                                        resource
                                            .items()
                                            .iter()
                                            .map(|t| t.name.clone())
                                            .collect::<Vec<_>>()
                                    })
                                    .into_iter()
                                    .map(|name| view! { <option value=name.clone()>{name}</option> })
                                    .collect_view()
                            }}
                        </select>
                    </label>
                    <FormField label="Target" value=form.target placeholder="server or group" />
                    <label class="form-group">
                        <span>"Frequency"</span>
                        <select on:change=move |ev| {
                            if let Ok(frequency) = event_target_value(&ev).parse() {
                                form.frequency.set(frequency);
                            }
                        }>
                            <option value="daily">"Daily"</option>
                            <option value="weekly">"Weekly"</option>
                            <option value="monthly">"Monthly"</option>
                        </select>
                    </label>
                    <FormField label="Time" value=form.time kind="time" />
                    <Show when=move || form.frequency.get() == Frequency::Weekly>
                        <label class="form-group">
                            <span>"Day of week"</span>
                            <select on:change=move |ev| {
                                if let Ok(day) = event_target_value(&ev).parse() {
                                    form.day_of_week.set(day);
                                }
                            }>
                                {WEEKDAY_OPTIONS
                                    .iter()
                                    .enumerate()
                                    .map(|(day, label)| {
                                        let selected = usize::from(form.day_of_week.get_untracked()) == day;
                                        view! {
                                            <option value=day.to_string() selected=selected>{*label}</option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </label>
                    </Show>
                    <Show when=move || form.frequency.get() == Frequency::Monthly>
                        <FormField label="Day of month" value=form.day_of_month kind="number" />
                    </Show>
                    <label class="checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || form.paused.get()
                            on:change=move |ev| form.paused.set(event_target_checked(&ev))
                        />
                        "Create paused"
                    </label>
                    <p class="form-hint">{move || preview.get()}</p>
                    <FormActions
                        submitting=Signal::derive(move || modal.with(|m| m.submitting))
                        submit_label="Create"
                        on_submit=submit
                        on_cancel=close
                    />
                </Modal>
            </Show>
        </div>
    }
}
