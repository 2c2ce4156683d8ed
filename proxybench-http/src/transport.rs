//! Transport seam between the runners and the network.
//!
//! Sweeps and the publish pool only see [`ProxyTransport`]. The production
//! implementation is [`HttpTransport`] on top of a shared `reqwest::Client`;
//! tests plug in recording or failing transports.

use crate::method::ProxyMethod;
use async_trait::async_trait;
use bytes::Bytes;
use proxybench_core::error::{ProxyBenchError, Result};
use proxybench_core::options::LoadOptions;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::sync::Arc;

/// One request to the proxy.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: ProxyMethod,
    /// Listener index, also the last path segment of `url`
    pub index: u64,
    pub url: Url,
    /// Pre-encoded JSON body
    pub body: Bytes,
}

impl ProxyRequest {
    #[must_use]
    pub const fn new(method: ProxyMethod, index: u64, url: Url, body: Bytes) -> Self {
        Self {
            method,
            index,
            url,
            body,
        }
    }
}

/// Sends proxy requests.
///
/// # Returns
///
/// - `Ok(status)` - the proxy answered, whatever the status code
/// - `Err(ProxyBenchError::Transport)` - no response (refused, reset, timeout)
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn send(&self, request: ProxyRequest) -> Result<u16>;
}

#[async_trait]
impl<T: ProxyTransport + ?Sized> ProxyTransport for Arc<T> {
    async fn send(&self, request: ProxyRequest) -> Result<u16> {
        (**self).send(request).await
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client sized for `options.workers` concurrent requests.
    ///
    /// No timeout is set unless `options.request_timeout` is.
    pub fn new(options: &LoadOptions) -> Result<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(options.workers);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProxyBenchError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProxyTransport for HttpTransport {
    async fn send(&self, request: ProxyRequest) -> Result<u16> {
        let ProxyRequest {
            method,
            index,
            url,
            body,
        } = request;

        let response = self
            .client
            .request(method.to_http(), url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ProxyBenchError::transport(method.as_str(), index, error_chain(&e)))?;

        let status = response.status().as_u16();
        // Drain so the connection goes back to the pool.
        let _ = response.bytes().await;
        Ok(status)
    }
}

/// `reqwest` errors keep the useful part (refused, timed out...) in their sources.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
