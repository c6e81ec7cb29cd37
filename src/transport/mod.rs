//! HTTP transport layer for the Brawlhalla client.
//!
//! Provides the transport abstraction used by the request pipeline and a
//! reqwest-backed implementation. The API is read-only, so only GET is modeled.

mod http;

pub use http::{build_url, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response or request.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
