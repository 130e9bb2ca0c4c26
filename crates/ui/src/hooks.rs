//! Reactive wrappers around `playdeck-core` fetchers.
//!
//! A [`RemoteList`] belongs to the component that created it: the fetcher is
//! torn down in `on_cleanup`, so responses that land after navigation are
//! dropped instead of writing to disposed signals.

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use playdeck_core::{
    ModalState, Mutation, MutationDispatcher, NameResolver, RefreshPolicy, Resource,
    ResourceDescriptor, ResourceFetcher,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::api;

/// One remote collection mounted in a component.
pub struct RemoteList<T: 'static> {
    /// Mirror of the fetcher state, updated on every change.
    pub state: RwSignal<Resource<T>>,
    fetcher: StoredValue<Rc<ResourceFetcher<T>>, LocalStorage>,
}

impl<T: 'static> Clone for RemoteList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for RemoteList<T> {}

impl<T> RemoteList<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// The underlying fetcher, `None` once the owner is disposed.
    pub fn fetcher(&self) -> Option<Rc<ResourceFetcher<T>>> {
        self.fetcher.try_get_value()
    }

    /// Issue one more request in the background.
    pub fn refresh(&self) {
        if let Some(fetcher) = self.fetcher() {
            spawn_local(async move {
                fetcher.refresh().await;
            });
        }
    }

    /// Submit `mutation` from `modal`, re-fetching this list afterwards when
    /// `policy` asks for it.
    pub fn submit(&self, modal: RwSignal<ModalState>, mutation: Mutation, policy: RefreshPolicy) {
        let list = *self;
        submit_modal(modal, mutation, move |_| {
            if policy == RefreshPolicy::Refetch {
                list.refresh();
            }
        });
    }

    /// Dispatch a mutation with no dialog, e.g. a delete button. Failures
    /// land in `notice`.
    pub fn dispatch(&self, mutation: Mutation, policy: RefreshPolicy, notice: RwSignal<Option<String>>) {
        let Some(fetcher) = self.fetcher() else {
            return;
        };
        let dispatcher = MutationDispatcher::new(api::transport());
        spawn_local(async move {
            let outcome = dispatcher
                .dispatch_then_refresh(&mutation, policy, &fetcher)
                .await;
            notice.try_set(outcome.err().map(|e| e.to_string()));
        });
    }

    fn start(&self, poll: Option<Duration>) {
        let Some(fetcher) = self.fetcher() else {
            return;
        };
        spawn_local(async move {
            match poll {
                Some(interval) => {
                    fetcher
                        .poll(interval, gloo_timers::future::sleep)
                        .await;
                }
                None => {
                    fetcher.refresh().await;
                }
            }
        });
    }
}

/// Mount a fetcher for `descriptor` and load it once, or every `poll`.
pub fn use_remote_list<T>(descriptor: ResourceDescriptor, poll: Option<Duration>) -> RemoteList<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let state = RwSignal::new(Resource::Loading);
    let fetcher = Rc::new(ResourceFetcher::new(api::transport(), descriptor));
    fetcher.observe(move |resource| {
        state.try_set(resource.clone());
    });

    let list = RemoteList {
        state,
        fetcher: StoredValue::new_local(fetcher),
    };
    list.start(poll);

    on_cleanup(move || {
        list.fetcher.try_with_value(|fetcher| fetcher.teardown());
    });
    list
}

/// Submit `mutation` for an open dialog.
///
/// A second submit while one is in flight is ignored. On a 2xx response the
/// dialog closes and `on_success` receives the body; on failure the dialog
/// stays open with the error message.
pub fn submit_modal(
    modal: RwSignal<ModalState>,
    mutation: Mutation,
    on_success: impl FnOnce(Value) + 'static,
) {
    let mut snapshot = modal.get_untracked();
    if snapshot.submitting || !snapshot.open {
        return;
    }
    modal.update(|state| state.submitting = true);

    let dispatcher = MutationDispatcher::new(api::transport());
    spawn_local(async move {
        let outcome = dispatcher.submit(&mut snapshot, &mutation).await;
        modal.try_set(snapshot);
        match outcome {
            Ok(value) => on_success(value),
            Err(e) => web_sys::console::error_1(
                &format!("{} failed: {e}", mutation.label()).into(),
            ),
        }
    });
}

/// A name resolver scoped to the calling component.
pub fn use_name_resolver() -> StoredValue<Rc<NameResolver>, LocalStorage> {
    StoredValue::new_local(Rc::new(NameResolver::new(api::transport())))
}
