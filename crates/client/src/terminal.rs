//! Terminal sockets with tokio-tungstenite.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use playdeck_core::{Frame, Socket, SocketConnector};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;

/// Opens terminal sockets, giving up after `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct WsConnector {
    timeout: Duration,
}

impl WsConnector {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub const fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout)
    }
}

#[async_trait(?Send)]
impl SocketConnector for WsConnector {
    type Socket = WsSocket;

    async fn connect(&self, url: &Url) -> playdeck_core::Result<WsSocket> {
        debug!(%url, "Opening terminal socket");
        let connecting = connect_async(url.as_str());

        let (stream, response) = tokio::time::timeout(self.timeout, connecting)
            .await
            .map_err(|_| playdeck_core::Error::connect_failed(url.as_str(), "timed out"))?
            .map_err(|e| playdeck_core::Error::connect_failed(url.as_str(), e.to_string()))?;

        info!(%url, status = response.status().as_u16(), "Terminal socket open");
        Ok(WsSocket { stream })
    }
}

/// One open terminal socket.
pub struct WsSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for WsSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsSocket").finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl Socket for WsSocket {
    async fn send_text(&mut self, text: String) -> playdeck_core::Result<()> {
        self.stream
            .send(Message::text(text))
            .await
            .map_err(|e| playdeck_core::Error::socket(e.to_string()))
    }

    async fn next_frame(&mut self) -> Option<playdeck_core::Result<Frame>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(playdeck_core::Error::socket(e.to_string()))),
            };
            match message {
                Message::Text(text) => return Some(Ok(Frame::Text(text.to_string()))),
                Message::Binary(bytes) => return Some(Ok(Frame::Binary(bytes.to_vec()))),
                Message::Close(_) => return Some(Ok(Frame::Close)),
                // tungstenite answers pings itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) -> playdeck_core::Result<()> {
        self.stream
            .close(None)
            .await
            .map_err(|e| playdeck_core::Error::socket(e.to_string()))
    }
}
