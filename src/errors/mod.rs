//! Error types for the Brawlhalla client.
//!
//! Covers configuration problems, provider-reported failures (rate limiting
//! and other non-200 statuses), transport failures, and payloads that do not
//! match the JSON object/array contract of the API.

use thiserror::Error;

/// Result type alias for Brawlhalla operations.
pub type BrawlhallaResult<T> = Result<T, BrawlhallaError>;

/// Detail used when an error response carries no parseable message.
pub const NO_FURTHER_DETAILS: &str = "No further details.";

/// Error type for Brawlhalla client operations.
#[derive(Debug, Error)]
pub enum BrawlhallaError {
    /// Configuration error (missing API key, invalid base URL, bad limits).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The provider answered with HTTP 429.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Any other non-200 response.
    #[error("Upstream error (HTTP {status} {reason}): {detail}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
        /// Best-effort message extracted from the response body.
        detail: String,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// A successful response whose body is neither a JSON object nor an array.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl BrawlhallaError {
    /// Returns the HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BrawlhallaError::RateLimited { .. } => Some(429),
            BrawlhallaError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the provider rejected the request for exceeding its quota.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BrawlhallaError::RateLimited { .. })
    }

    /// Returns true if repeating the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrawlhallaError::RateLimited { .. }
                | BrawlhallaError::Upstream { status: 500..=504, .. }
                | BrawlhallaError::Network { .. }
        )
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        BrawlhallaError::Configuration {
            message: message.into(),
        }
    }

    /// Creates an upstream error.
    pub fn upstream(status: u16, reason: impl Into<String>, detail: impl Into<String>) -> Self {
        BrawlhallaError::Upstream {
            status,
            reason: reason.into(),
            detail: detail.into(),
        }
    }
}

/// Error envelope returned by the Brawlhalla API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Detailed API error information.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// The error code, in whatever form the provider sent it.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// The error message.
    pub message: String,
}

impl ApiErrorResponse {
    /// Extracts the error message from a raw body, falling back to
    /// [`NO_FURTHER_DETAILS`].
    pub fn detail_from_body(body: &[u8]) -> String {
        serde_json::from_slice::<ApiErrorResponse>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| NO_FURTHER_DETAILS.to_string())
    }
}

impl From<serde_json::Error> for BrawlhallaError {
    fn from(err: serde_json::Error) -> Self {
        BrawlhallaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for BrawlhallaError {
    fn from(err: url::ParseError) -> Self {
        BrawlhallaError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
