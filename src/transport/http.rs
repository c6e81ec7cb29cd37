//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use super::TransportError;
use crate::observability::redact_credentials;

/// HTTP GET request representation.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Request path, relative to the base URL.
    pub path: String,
    /// Query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Appends a query pair.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// Joins the base URL and request path and appends the percent-encoded query.
pub fn build_url(base_url: &str, request: &HttpRequest) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        request.path.trim_start_matches('/')
    ))?;

    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(request.query.iter());
    }

    Ok(url)
}

/// HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP GET request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
///
/// The underlying connection pool lives as long as this value and is released
/// when the owning client is dropped.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("brawlhalla-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = build_url(&self.base_url, &request).map_err(|e| {
            TransportError::InvalidResponse {
                message: format!("Invalid request URL: {}", e),
            }
        })?;

        tracing::debug!(url = %redact_credentials(url.as_str()), "Sending request");

        let mut req_builder = self.client.get(url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    timeout: request.timeout.unwrap_or_default(),
                }
            } else if e.is_connect() {
                TransportError::Connection {
                    message: redact_credentials(&e.to_string()),
                }
            } else {
                TransportError::InvalidResponse {
                    message: redact_credentials(&e.to_string()),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        timeout: request.timeout.unwrap_or_default(),
                    }
                } else {
                    TransportError::InvalidResponse {
                        message: redact_credentials(&e.to_string()),
                    }
                }
            })?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .finish()
    }
}
