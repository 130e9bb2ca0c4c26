//! One-shot and polling fetches of a remote collection.
//!
//! A `ResourceFetcher` belongs to exactly one mounted view. Its state sits in
//! `RefCell`s that are never borrowed across an await point, so the fetcher
//! can be shared as `Rc<ResourceFetcher<T>>` between a render closure and a
//! spawned local task.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use serde::de::DeserializeOwned;

use crate::descriptor::{ResourceDescriptor, decode_one};
use crate::resource::{Applied, RequestToken, Resource, ResourceSlot};
use crate::result::Result;
use crate::transport::Transport;

type Observer<T> = Box<dyn Fn(&Resource<T>)>;

/// Tracks the tri-state of one remote collection for one view.
pub struct ResourceFetcher<T> {
    transport: Rc<dyn Transport>,
    descriptor: ResourceDescriptor,
    slot: RefCell<ResourceSlot<T>>,
    in_flight: RefCell<Vec<(RequestToken, AbortHandle)>>,
    torn_down: Cell<bool>,
    observers: RefCell<Vec<Observer<T>>>,
}

impl<T> ResourceFetcher<T>
where
    T: DeserializeOwned + Clone,
{
    pub fn new(transport: Rc<dyn Transport>, descriptor: ResourceDescriptor) -> Self {
        Self {
            transport,
            descriptor,
            slot: RefCell::new(ResourceSlot::new()),
            in_flight: RefCell::new(Vec::new()),
            torn_down: Cell::new(false),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub const fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Resource<T> {
        self.slot.borrow().state().clone()
    }

    /// Borrow the current state without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&Resource<T>) -> R) -> R {
        f(self.slot.borrow().state())
    }

    /// Register a callback run after every state change.
    ///
    /// Observers must not call [`ResourceFetcher::refresh`] synchronously.
    pub fn observe(&self, observer: impl Fn(&Resource<T>) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    /// Issue one request and apply its response if it is still current.
    ///
    /// Failures land in `Resource::Failed`; there is no retry.
    pub async fn refresh(&self) -> Applied {
        if self.torn_down.get() {
            return Applied::Stale;
        }

        let token = self.slot.borrow_mut().begin();
        self.notify();

        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight.borrow_mut().push((token, handle));
        tracing::debug!(
            resource = self.descriptor.label,
            path = self.descriptor.path,
            token = token.value(),
            "fetching"
        );

        let outcome = Abortable::new(self.transport.get(self.descriptor.path), registration).await;
        self.in_flight.borrow_mut().retain(|(t, _)| *t != token);

        let result = match outcome {
            Ok(response) => response.and_then(|body| self.descriptor.decode_list(body)),
            Err(_aborted) => {
                tracing::debug!(resource = self.descriptor.label, "request aborted");
                return Applied::Stale;
            }
        };

        if let Err(e) = &result {
            tracing::warn!(resource = self.descriptor.label, error = %e, "fetch failed");
        }

        let applied = self.slot.borrow_mut().apply(token, result);
        match applied {
            Applied::Current => self.notify(),
            Applied::Stale => tracing::debug!(
                resource = self.descriptor.label,
                token = token.value(),
                "discarding stale response"
            ),
        }
        applied
    }

    /// Refresh now and then every `interval` until teardown.
    ///
    /// `sleep` is the platform timer.
    pub async fn poll<F, Fut>(&self, interval: Duration, mut sleep: F)
    where
        F: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        while !self.torn_down.get() {
            self.refresh().await;
            if self.torn_down.get() {
                break;
            }
            sleep(interval).await;
        }
    }

    /// Abort in-flight requests and stop applying responses. Idempotent.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        self.slot.borrow_mut().invalidate();
        let in_flight: Vec<_> = self.in_flight.borrow_mut().drain(..).collect();
        for (_, handle) in in_flight {
            handle.abort();
        }
        self.observers.borrow_mut().clear();
        tracing::debug!(resource = self.descriptor.label, "fetcher torn down");
    }

    fn notify(&self) {
        let slot = self.slot.borrow();
        for observer in self.observers.borrow().iter() {
            observer(slot.state());
        }
    }
}

impl<T> Drop for ResourceFetcher<T> {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.get_mut().drain(..) {
            handle.abort();
        }
    }
}

/// Fetch and decode a single entity.
///
/// # Errors
///
/// Propagates transport failures and returns `Error::Decode` for a payload
/// that is not a `T`.
pub async fn fetch_entity<T: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    what: &str,
    envelope: Option<&str>,
) -> Result<T> {
    let body = transport.get(path).await?;
    decode_one(what, envelope, body)
}
