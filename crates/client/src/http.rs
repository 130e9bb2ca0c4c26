//! JSON over HTTP with reqwest.

use async_trait::async_trait;
use playdeck_core::Transport;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url: normalize_base(&config.api_base()?),
        })
    }

    /// The base every request path is appended to, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> playdeck_core::Result<Value> {
        let url = self.url_for(path);
        debug!(%method, %url, "Sending request");

        let request = self.http_client.request(method, &url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "Request failed");
            playdeck_core::Error::network_failure(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Request rejected");
            return Err(playdeck_core::Error::status(path, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| playdeck_core::Error::network_failure(e.to_string()))?;

        decode_body(path, status, &bytes)
    }
}

fn normalize_base(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

fn decode_body(path: &str, status: StatusCode, bytes: &[u8]) -> playdeck_core::Result<Value> {
    if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| playdeck_core::Error::decode(path, e.to_string()))
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> playdeck_core::Result<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> playdeck_core::Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> playdeck_core::Result<Value> {
        self.send(Method::DELETE, path, None).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport_for(server: &MockServer) -> HttpTransport {
        let config = ClientConfig::with_base_url(Url::parse(&server.uri()).unwrap())
            .timeout(Duration::from_secs(5));
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_decodes_json() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/servers/getServers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "web-01", "ip_address": "10.0.0.1"}
            ])))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let body = transport.get("/servers/getServers").await?;

        assert_eq!(body.as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_trailing_slash_base_is_joined_once() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/templates/getTemplates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"templates": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base = Url::parse(&format!("{}/", mock_server.uri()))?;
        let transport = HttpTransport::new(&ClientConfig::with_base_url(base))?;
        transport.get("templates/getTemplates").await?;

        assert!(!transport.base_url().ends_with('/'));
        Ok(())
    }

    #[tokio::test]
    async fn test_post_sends_json_body() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;
        let payload = json!({"name": "uptime", "module": "shell"});

        Mock::given(method("POST"))
            .and(path("/configurations/create"))
            .and(body_json(payload.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let body = transport.post("/configurations/create", payload).await?;

        assert_eq!(body.get("id").and_then(Value::as_i64), Some(7));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_body_is_null() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/templates/delete/3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let body = transport.delete("/templates/delete/3").await?;

        assert_eq!(body, Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/logs/getLogs"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let result = transport.get("/logs/getLogs").await;

        assert_eq!(
            result,
            Err(playdeck_core::Error::status("/logs/getLogs", 503))
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/servers/getServers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let result = transport.get("/servers/getServers").await;

        assert!(matches!(result, Err(playdeck_core::Error::Decode { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        // Port 9 (discard) on localhost is closed in test environments.
        let config = ClientConfig::with_base_url(Url::parse("http://127.0.0.1:9").unwrap())
            .timeout(Duration::from_secs(2));
        let transport = HttpTransport::new(&config).unwrap();

        let result = transport.get("/servers/getServers").await;

        assert!(result.is_err_and(|e| e.is_network_failure()));
    }
}
