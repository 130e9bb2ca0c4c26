//! Behavioral tests for the resource view pattern
//!
//! BDD-style tests using given-when-then naming. The fakes below stand in
//! for the network so every behavior runs on a single-threaded executor.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

pub mod fetcher_behaviors;
pub mod mutation_behaviors;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::{mpsc, oneshot};
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::result::Result;
use crate::stream::{Frame, Socket, SocketConnector};
use crate::transport::Transport;

/// Scripted transport. Deferred replies take priority over fixed ones.
#[derive(Default)]
pub struct FakeTransport {
    fixed: RefCell<HashMap<String, Result<Value>>>,
    deferred: RefCell<HashMap<String, VecDeque<oneshot::Receiver<Result<Value>>>>>,
    calls: RefCell<Vec<(&'static str, String)>>,
    bodies: RefCell<Vec<Value>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `path` with `reply`.
    pub fn with(self, path: &str, reply: Result<Value>) -> Self {
        self.fixed.borrow_mut().insert(path.to_string(), reply);
        self
    }

    /// Queue a reply for `path` that is answered through the returned sender.
    pub fn defer(&self, path: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.deferred
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.borrow().iter().filter(|(_, p)| p == path).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(|(m, _)| *m).collect()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.borrow().clone()
    }

    async fn answer(&self, method: &'static str, path: &str) -> Result<Value> {
        self.calls.borrow_mut().push((method, path.to_string()));
        let deferred = self
            .deferred
            .borrow_mut()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        if let Some(rx) = deferred {
            return rx
                .await
                .unwrap_or_else(|_| Err(Error::network_failure("reply dropped")));
        }
        self.fixed
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(Error::status(path, 404)))
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, path: &str) -> Result<Value> {
        self.answer("GET", path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.bodies.borrow_mut().push(body);
        self.answer("POST", path).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.answer("DELETE", path).await
    }
}

/// What a fake socket observed.
#[derive(Default, Clone)]
pub struct SocketRecorder {
    pub sent: Rc<RefCell<Vec<String>>>,
    pub closes: Rc<Cell<usize>>,
}

impl SocketRecorder {
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.get()
    }
}

/// Socket fed by an unbounded channel. Dropping the sender ends the stream.
pub struct FakeSocket {
    incoming: mpsc::UnboundedReceiver<Frame>,
    recorder: SocketRecorder,
    fail_sends: bool,
}

impl FakeSocket {
    pub fn new() -> (Self, mpsc::UnboundedSender<Frame>, SocketRecorder) {
        let (tx, rx) = mpsc::unbounded();
        let recorder = SocketRecorder::default();
        let socket = Self {
            incoming: rx,
            recorder: recorder.clone(),
            fail_sends: false,
        };
        (socket, tx, recorder)
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }
}

#[async_trait(?Send)]
impl Socket for FakeSocket {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.fail_sends {
            return Err(Error::socket("broken pipe"));
        }
        self.recorder.sent.borrow_mut().push(text);
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Result<Frame>> {
        self.incoming.next().await.map(Ok)
    }

    async fn close(&mut self) -> Result<()> {
        self.recorder.closes.set(self.recorder.closes.get() + 1);
        Ok(())
    }
}

/// Hands out queued sockets, or waits on a deferred one.
#[derive(Default)]
pub struct FakeConnector {
    ready: RefCell<VecDeque<FakeSocket>>,
    deferred: RefCell<Option<oneshot::Receiver<FakeSocket>>>,
    urls: RefCell<Vec<String>>,
}

impl FakeConnector {
    pub fn with_socket(socket: FakeSocket) -> Self {
        let connector = Self::default();
        connector.ready.borrow_mut().push_back(socket);
        connector
    }

    pub fn refusing() -> Self {
        Self::default()
    }

    pub fn deferred() -> (Self, oneshot::Sender<FakeSocket>) {
        let (tx, rx) = oneshot::channel();
        let connector = Self::default();
        *connector.deferred.borrow_mut() = Some(rx);
        (connector, tx)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SocketConnector for FakeConnector {
    type Socket = FakeSocket;

    async fn connect(&self, url: &Url) -> Result<FakeSocket> {
        self.urls.borrow_mut().push(url.to_string());
        let deferred = self.deferred.borrow_mut().take();
        if let Some(rx) = deferred {
            return rx
                .await
                .map_err(|_| Error::connect_failed(url.as_str(), "connector dropped"));
        }
        self.ready
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::connect_failed(url.as_str(), "connection refused"))
    }
}

pub fn shared(transport: FakeTransport) -> Rc<FakeTransport> {
    Rc::new(transport)
}
