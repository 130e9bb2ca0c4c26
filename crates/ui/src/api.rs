//! Backend endpoints and the browser HTTP transport.
//!
//! URLs are fixed at build time: `PLAYDECK_API_URL` and `PLAYDECK_WS_URL`
//! are read with `option_env!` when Trunk compiles the bundle.

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use playdeck_core::{Error, Result, Transport};
use serde_json::Value;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// API base URL without a trailing slash.
#[must_use]
pub fn api_base() -> String {
    option_env!("PLAYDECK_API_URL")
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// WebSocket base URL for terminals.
#[must_use]
pub fn ws_base() -> String {
    option_env!("PLAYDECK_WS_URL").map_or_else(
        || websocket_base(&api_base()),
        |url| url.trim_end_matches('/').to_string(),
    )
}

/// Swap an `http(s)` scheme for `ws(s)`. Other schemes pass through and are
/// rejected when the terminal URL is built.
#[must_use]
pub fn websocket_base(http_base: &str) -> String {
    if let Some(rest) = http_base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = http_base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        http_base.to_string()
    }
}

/// Join an API path onto a base URL with exactly one slash.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Decode a 2xx body. Empty bodies are `Null`.
///
/// # Errors
///
/// Returns `Error::Decode` when the body is not JSON.
pub fn parse_body(path: &str, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| Error::decode(path, e.to_string()))
}

/// `fetch` based transport.
#[derive(Debug, Clone)]
pub struct BrowserTransport {
    base_url: String,
}

impl BrowserTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn read(path: &str, response: Response) -> Result<Value> {
        if !response.ok() {
            return Err(Error::status(path, response.status()));
        }
        let text = response
            .text()
            .await
            .map_err(|e| Error::network_failure(e.to_string()))?;
        parse_body(path, &text)
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn get(&self, path: &str) -> Result<Value> {
        let response = Request::get(&self.url_for(path))
            .send()
            .await
            .map_err(|e| Error::network_failure(e.to_string()))?;
        Self::read(path, response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let request = Request::post(&self.url_for(path))
            .json(&body)
            .map_err(|e| Error::decode(path, e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| Error::network_failure(e.to_string()))?;
        Self::read(path, response).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        let response = Request::delete(&self.url_for(path))
            .send()
            .await
            .map_err(|e| Error::network_failure(e.to_string()))?;
        Self::read(path, response).await
    }
}

/// Transport for the configured backend.
#[must_use]
pub fn transport() -> Rc<dyn Transport> {
    Rc::new(BrowserTransport::new(api_base()))
}
