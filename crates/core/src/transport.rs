//! The HTTP seam between views and a platform client.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::Result;

/// JSON over HTTP, relative to an API base URL.
///
/// Implementations map a rejected request to `Error::NetworkFailure`, a
/// non-2xx response to `Error::Status` and an unparsable body to
/// `Error::Decode`. An empty 2xx body is `Value::Null`.
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, path: &str) -> Result<Value>;

    async fn post(&self, path: &str, body: Value) -> Result<Value>;

    async fn delete(&self, path: &str) -> Result<Value>;
}
