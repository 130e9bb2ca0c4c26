//! Live terminal stream over a WebSocket.
//!
//! State machine: `Disconnected -> Connecting -> Open -> Closed`. A view owns
//! at most one socket and closes it on every exit path. Incoming frames are
//! appended verbatim to an output buffer.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{Fuse, FutureExt};
use futures::stream::{Stream, StreamExt};
use url::Url;

use crate::error::Error;
use crate::models::{Secret, Server};
use crate::result::Result;

/// Appended to the output when the stream ends.
pub const CONNECTION_CLOSED_MARKER: &str = "\nConnection closed.\n";

const TERMINAL_PATH: &str = "ws/terminal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting..."),
            Self::Open => write!(f, "Connected"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// A frame received from the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

/// A connected, bidirectional text socket.
#[async_trait(?Send)]
pub trait Socket {
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Next frame, or `None` once the peer is gone.
    async fn next_frame(&mut self) -> Option<Result<Frame>>;

    async fn close(&mut self) -> Result<()>;
}

/// Opens sockets of one kind.
#[async_trait(?Send)]
pub trait SocketConnector {
    type Socket: Socket;

    async fn connect(&self, url: &Url) -> Result<Self::Socket>;
}

/// Login used on the target host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCredentials {
    pub username: String,
    pub password: Secret,
}

/// Which server a terminal attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalTarget {
    pub server_ip: String,
    pub credentials: TerminalCredentials,
}

impl TerminalTarget {
    pub fn new(
        server_ip: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            server_ip: server_ip.into(),
            credentials: TerminalCredentials {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// Socket URL under `ws_base`. Only `server_ip` goes in the query.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `ws_base` is not a `ws`/`wss` URL.
    pub fn url(&self, ws_base: &str) -> Result<Url> {
        let base = format!("{}/", ws_base.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .and_then(|base| base.join(TERMINAL_PATH))
            .map_err(|e| Error::invalid_url(ws_base, e.to_string()))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::invalid_url(ws_base, "scheme must be ws or wss"));
        }
        url.query_pairs_mut()
            .append_pair("server_ip", &self.server_ip);
        Ok(url)
    }

    /// First frame sent after the socket opens.
    #[must_use]
    pub fn handshake_frame(&self) -> String {
        serde_json::json!({
            "type": "auth",
            "username": self.credentials.username,
            "password": self.credentials.password.expose(),
        })
        .to_string()
    }
}

impl From<&Server> for TerminalTarget {
    fn from(server: &Server) -> Self {
        Self::new(
            server.ip_address.clone(),
            server.username.clone(),
            server.password.clone(),
        )
    }
}

/// Result of a send attempt. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent,
    NotOpen,
    EmptyInput,
    Failed(Error),
}

/// Input fed into [`LiveStreamView::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamCommand {
    Input(String),
    Close,
}

/// What happened during one step of [`LiveStreamView::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Opened,
    Output(String),
    Sent(String),
    Rejected(SendOutcome),
    Closed,
}

/// Requests teardown of a view from outside the task driving it.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl TeardownHandle {
    fn pair() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        let handle = Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        (handle, receiver)
    }

    /// Ask the view to close. Idempotent.
    pub fn request(&self) {
        let sender = match self.sender.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(sender) = sender {
            // The view may already be gone.
            let _ = sender.send(());
        }
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.sender.lock().map_or(true, |slot| slot.is_none())
    }
}

enum Step {
    Frame(Option<Result<Frame>>),
    Command(Option<StreamCommand>),
    Teardown,
}

/// A terminal view bound to one socket for its whole life.
pub struct LiveStreamView<S> {
    state: StreamState,
    output: String,
    input: String,
    socket: Option<S>,
    last_error: Option<Error>,
    teardown: TeardownHandle,
    teardown_rx: Fuse<oneshot::Receiver<()>>,
}

impl<S: Socket> Default for LiveStreamView<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Socket> LiveStreamView<S> {
    pub fn new() -> Self {
        let (teardown, receiver) = TeardownHandle::pair();
        Self {
            state: StreamState::Disconnected,
            output: String::new(),
            input: String::new(),
            socket: None,
            last_error: None,
            teardown,
            teardown_rx: receiver.fuse(),
        }
    }

    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Everything received so far, plus the close marker once closed.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub const fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub const fn has_socket(&self) -> bool {
        self.socket.is_some()
    }

    /// Handle that can close this view from another task.
    pub fn teardown_handle(&self) -> TeardownHandle {
        self.teardown.clone()
    }

    /// Open the socket and authenticate.
    ///
    /// Only valid from `Disconnected`. A teardown requested while the open is
    /// in flight aborts it; a socket that arrives anyway is closed at once.
    pub async fn connect<C>(
        &mut self,
        connector: &C,
        target: &TerminalTarget,
        ws_base: &str,
    ) -> StreamState
    where
        C: SocketConnector<Socket = S>,
    {
        if self.state != StreamState::Disconnected {
            return self.state;
        }
        let url = match target.url(ws_base) {
            Ok(url) => url,
            Err(e) => {
                self.state = StreamState::Connecting;
                self.fail(e);
                return self.state;
            }
        };

        self.state = StreamState::Connecting;
        tracing::info!(server_ip = %target.server_ip, url = %url, "connecting terminal");

        let mut connecting = connector.connect(&url).fuse();
        let outcome = futures::select! {
            result = &mut connecting => Some(result),
            _ = &mut self.teardown_rx => None,
        };
        let outcome = match outcome {
            Some(result) => result,
            None => match connecting.now_or_never() {
                Some(late) => late,
                None => {
                    tracing::debug!("terminal teardown while connecting, open aborted");
                    self.finish_closed();
                    return self.state;
                }
            },
        };

        let mut socket = match outcome {
            Ok(socket) => socket,
            Err(e) => {
                self.fail(e);
                return self.state;
            }
        };

        if self.teardown.is_requested() {
            tracing::debug!("terminal teardown before open, closing late socket");
            Self::close_quietly(&mut socket).await;
            self.finish_closed();
            return self.state;
        }

        if let Err(e) = socket.send_text(target.handshake_frame()).await {
            Self::close_quietly(&mut socket).await;
            self.fail(e);
            return self.state;
        }

        self.socket = Some(socket);
        self.state = StreamState::Open;
        tracing::info!(server_ip = %target.server_ip, "terminal open");
        self.state
    }

    /// Send the current input as one line.
    ///
    /// Nothing is sent unless the view is open and the input has visible
    /// characters. The input is cleared only after a successful send.
    pub async fn submit(&mut self) -> SendOutcome {
        if self.state != StreamState::Open {
            return SendOutcome::NotOpen;
        }
        if self.input.trim().is_empty() {
            return SendOutcome::EmptyInput;
        }
        let Some(socket) = self.socket.as_mut() else {
            return SendOutcome::NotOpen;
        };

        let frame = format!("{}\n", self.input);
        match socket.send_text(frame).await {
            Ok(()) => {
                self.input.clear();
                SendOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, "terminal send failed");
                SendOutcome::Failed(e)
            }
        }
    }

    /// Replace the input with `line` and submit it.
    pub async fn send_line(&mut self, line: impl Into<String>) -> SendOutcome {
        self.input = line.into();
        self.submit().await
    }

    /// Wait for the next frame or a teardown request. `None` once closed.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        if self.state != StreamState::Open {
            return None;
        }
        let step = {
            let socket = self.socket.as_mut()?;
            futures::select! {
                frame = socket.next_frame().fuse() => Step::Frame(frame),
                _ = &mut self.teardown_rx => Step::Teardown,
            }
        };
        Some(self.handle_step(step).await)
    }

    /// Drive the view until it closes, feeding `commands` in and reporting
    /// every event to `on_event`. An exhausted command stream closes the view.
    pub async fn run<C, F>(&mut self, commands: C, mut on_event: F)
    where
        C: Stream<Item = StreamCommand> + Unpin,
        F: FnMut(&StreamEvent),
    {
        let mut commands = commands.fuse();
        if self.state == StreamState::Open {
            on_event(&StreamEvent::Opened);
        }
        while self.state == StreamState::Open {
            let step = {
                let Some(socket) = self.socket.as_mut() else {
                    break;
                };
                futures::select! {
                    frame = socket.next_frame().fuse() => Step::Frame(frame),
                    command = commands.next() => Step::Command(command),
                    _ = &mut self.teardown_rx => Step::Teardown,
                }
            };
            let event = self.handle_step(step).await;
            on_event(&event);
        }
    }

    /// Close the socket once and mark the view closed. Idempotent.
    pub async fn teardown(&mut self) {
        self.teardown.request();
        match self.state {
            StreamState::Closed => {}
            StreamState::Disconnected => self.state = StreamState::Closed,
            StreamState::Connecting | StreamState::Open => {
                if let Some(mut socket) = self.socket.take() {
                    Self::close_quietly(&mut socket).await;
                }
                self.finish_closed();
                tracing::info!("terminal closed");
            }
        }
    }

    async fn handle_step(&mut self, step: Step) -> StreamEvent {
        match step {
            Step::Frame(frame) => self.handle_frame(frame),
            Step::Command(Some(StreamCommand::Input(line))) => {
                let frame = format!("{line}\n");
                match self.send_line(line).await {
                    SendOutcome::Sent => StreamEvent::Sent(frame),
                    outcome => StreamEvent::Rejected(outcome),
                }
            }
            Step::Command(Some(StreamCommand::Close) | None) | Step::Teardown => {
                self.teardown().await;
                StreamEvent::Closed
            }
        }
    }

    fn handle_frame(&mut self, frame: Option<Result<Frame>>) -> StreamEvent {
        match frame {
            Some(Ok(Frame::Text(text))) => {
                self.output.push_str(&text);
                StreamEvent::Output(text)
            }
            Some(Ok(Frame::Binary(bytes))) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                self.output.push_str(&text);
                StreamEvent::Output(text)
            }
            Some(Ok(Frame::Close)) | None => {
                tracing::info!("terminal closed by server");
                self.socket = None;
                self.finish_closed();
                StreamEvent::Closed
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "terminal socket error");
                self.socket = None;
                self.last_error = Some(e);
                self.finish_closed();
                StreamEvent::Closed
            }
        }
    }

    fn fail(&mut self, error: Error) {
        tracing::warn!(error = %error, "terminal connection failed");
        self.last_error = Some(error);
        self.finish_closed();
    }

    fn finish_closed(&mut self) {
        if self.state != StreamState::Closed {
            self.output.push_str(CONNECTION_CLOSED_MARKER);
            self.state = StreamState::Closed;
        }
    }

    async fn close_quietly(socket: &mut S) {
        if let Err(e) = socket.close().await {
            tracing::debug!(error = %e, "error while closing terminal socket");
        }
    }
}

impl<S> Drop for LiveStreamView<S> {
    fn drop(&mut self) {
        if self.socket.take().is_some() {
            tracing::warn!("terminal view dropped with an open socket, discarding handle");
        }
    }
}
