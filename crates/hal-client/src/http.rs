//! # HTTP Transport
//!
//! [`ReqwestTransport`] is the production [`Transport`]: a pooled `reqwest` client
//! configured by a [`TransportConfig`].
//!
//! Link hrefs in HAL documents are usually relative (`/v1/order/123`), so every
//! URI is resolved against `base_url` before it is sent. Absolute URIs pass
//! through untouched. The empty URI used by [`Navigator::root`](crate::Navigator::root)
//! resolves to the base itself.
//!
//! # Configuration Options
//!
//! | Option | Default | Env var |
//! |--------|---------|---------|
//! | `base_url` | none | `HAL_BASE_URL` |
//! | `timeout_seconds` | 30 | `HAL_TIMEOUT_SECS` |
//! | `headers` | none | `HAL_BEARER_TOKEN` adds `Authorization: Bearer ..` |
//! | `accept` | `application/hal+json, application/json` | |

use crate::codec::{HAL_JSON, JSON};
use crate::error::HalError;
use crate::transport::{HttpResponse, Payload, Transport};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;
use tracing::{trace, warn};
use url::Url;

pub const ENV_BASE_URL: &str = "HAL_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HAL_TIMEOUT_SECS";
pub const ENV_BEARER_TOKEN: &str = "HAL_BEARER_TOKEN";

/// Configuration for [`ReqwestTransport`].
///
/// # Example
///
/// ```
/// use hal_client::TransportConfig;
///
/// let config = TransportConfig {
///     base_url: Some("https://api.example.com/v1/".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.timeout_seconds, Some(30));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL relative hrefs are resolved against.
    pub base_url: Option<String>,

    /// Custom headers sent with every request.
    pub headers: Vec<(String, String)>,

    /// Request timeout in seconds. `None` disables the timeout.
    pub timeout_seconds: Option<u64>,

    /// Value of the `Accept` header.
    pub accept: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Vec::new(),
            timeout_seconds: Some(30),
            accept: format!("{HAL_JSON}, {JSON}"),
        }
    }
}

impl TransportConfig {
    /// Reads `HAL_BASE_URL`, `HAL_TIMEOUT_SECS` and `HAL_BEARER_TOKEN` from the
    /// process environment, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = Some(base_url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout_seconds = None,
                Ok(seconds) => config.timeout_seconds = Some(seconds),
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }

        if let Some(token) = lookup(ENV_BEARER_TOKEN) {
            config.headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        config
    }
}

impl From<reqwest::Error> for HalError {
    fn from(error: reqwest::Error) -> Self {
        HalError::Transport(Box::new(error))
    }
}

/// A [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    config: TransportConfig,
    base: Option<Url>,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, HalError> {
        let base = config
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| HalError::InvalidUri {
                    uri: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let mut client_builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(timeout));
        }
        let client = client_builder.build()?;

        Ok(Self { config, base, client })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Resolves `uri` against the configured base URL.
    pub fn resolve(&self, uri: &str) -> Result<Url, HalError> {
        let invalid = |reason: String| HalError::InvalidUri {
            uri: uri.to_string(),
            reason,
        };

        match Url::parse(uri) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base
                    .as_ref()
                    .ok_or_else(|| invalid("relative URI and no base URL configured".to_string()))?;
                base.join(uri).map_err(|e| invalid(e.to_string()))
            }
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Adds `Accept` and the configured custom headers to a request.
    fn prepare_request(&self, request_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = request_builder.header(ACCEPT, &self.config.accept);
        for (name, value) in &self.config.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        payload: Option<Payload>,
    ) -> Result<HttpResponse, HalError> {
        let url = self.resolve(uri)?;
        trace!(%method, %url, "Dispatching");

        let mut request = self.prepare_request(self.client.request(method, url));
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, payload.content_type)
                .body(payload.bytes);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body: (!body.is_empty()).then(|| body.to_vec()),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, uri: &str) -> Result<HttpResponse, HalError> {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.send(Method::POST, uri, Some(payload)).await
    }

    async fn put(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.send(Method::PUT, uri, Some(payload)).await
    }

    async fn patch(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.send(Method::PATCH, uri, Some(payload)).await
    }

    async fn delete(&self, uri: &str) -> Result<HttpResponse, HalError> {
        self.send(Method::DELETE, uri, None).await
    }
}
