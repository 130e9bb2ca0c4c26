//! Terminal sockets on top of `gloo-net` WebSockets.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::{Message, WebSocketError};
use playdeck_core::{Error, Frame, Result, Socket, SocketConnector};
use url::Url;

/// Opens browser WebSockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConnector;

#[async_trait(?Send)]
impl SocketConnector for BrowserConnector {
    type Socket = BrowserSocket;

    async fn connect(&self, url: &Url) -> Result<BrowserSocket> {
        web_sys::console::log_1(&format!("Opening terminal socket: {url}").into());
        let socket = WebSocket::open(url.as_str())
            .map_err(|e| Error::connect_failed(url.as_str(), e.to_string()))?;
        Ok(BrowserSocket {
            socket: Some(socket),
        })
    }
}

/// One browser WebSocket. Sends wait until the socket has opened.
pub struct BrowserSocket {
    socket: Option<WebSocket>,
}

impl std::fmt::Debug for BrowserSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSocket")
            .field("open", &self.socket.is_some())
            .finish()
    }
}

/// Map a received message to a terminal frame.
///
/// A close event ends the stream normally; every other error is a socket
/// failure.
#[must_use]
pub fn frame_from(message: std::result::Result<Message, WebSocketError>) -> Result<Frame> {
    match message {
        Ok(Message::Text(text)) => Ok(Frame::Text(text)),
        Ok(Message::Bytes(bytes)) => Ok(Frame::Binary(bytes)),
        Err(WebSocketError::ConnectionClose(_)) => Ok(Frame::Close),
        Err(e) => Err(Error::socket(e.to_string())),
    }
}

#[async_trait(?Send)]
impl Socket for BrowserSocket {
    async fn send_text(&mut self, text: String) -> Result<()> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| Error::socket("socket already closed"))?;
        socket
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::socket(e.to_string()))
    }

    async fn next_frame(&mut self) -> Option<Result<Frame>> {
        let socket = self.socket.as_mut()?;
        let message = socket.next().await?;
        Some(frame_from(message))
    }

    async fn close(&mut self) -> Result<()> {
        match self.socket.take() {
            Some(socket) => socket
                .close(None, None)
                .map_err(|e| Error::socket(e.to_string())),
            None => Ok(()),
        }
    }
}
