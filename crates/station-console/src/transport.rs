//! This module contains the shared logic for making JSON requests to the
//! Station backend.

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::RemoteError;

/// Header carrying the caller-supplied edit key on privileged requests.
pub const EDIT_KEY_HEADER: &str = "X-Edit-Key";

/// One JSON round trip to a backend path.
///
/// Implementations make exactly one attempt per call and report every failure
/// as a [`RemoteError`]; callers convert it into a value.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_json(&self, path: &str) -> Result<Value, RemoteError>;

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        edit_key: Option<&str>,
    ) -> Result<Value, RemoteError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn get_json(&self, path: &str) -> Result<Value, RemoteError> {
        (**self).get_json(path).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        edit_key: Option<&str>,
    ) -> Result<Value, RemoteError> {
        (**self).post_json(path, body, edit_key).await
    }
}

/// The reqwest-backed transport, rooted at the configured backend URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(path: &str, response: Response) -> Result<Value, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| RemoteError::Transport {
            path: path.to_string(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| RemoteError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<Value, RemoteError> {
        let url = self.url_for(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                path: path.to_string(),
                source,
            })?;
        Self::read_json(path, response).await
    }

    #[instrument(skip(self, body, edit_key))]
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        edit_key: Option<&str>,
    ) -> Result<Value, RemoteError> {
        let url = self.url_for(path);
        debug!(url = %url, privileged = edit_key.is_some(), "POST");
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = edit_key {
            request = request.header(EDIT_KEY_HEADER, key);
        }
        let response = request.send().await.map_err(|source| RemoteError::Transport {
            path: path.to_string(),
            source,
        })?;
        Self::read_json(path, response).await
    }
}
