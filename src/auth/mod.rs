//! Authentication module for the Brawlhalla client.
//!
//! The Brawlhalla API authenticates with an `api_key` query parameter rather
//! than a header, so providers append to the outgoing query pairs.

use secrecy::{ExposeSecret, SecretString};

use crate::errors::BrawlhallaError;

/// Name of the query parameter carrying the credential.
pub const API_KEY_PARAM: &str = "api_key";

/// Masks all but the last 4 characters of a key.
pub(crate) fn key_hint(key: &str) -> String {
    match key.char_indices().rev().nth(3) {
        Some((start, _)) if start > 0 => format!("...{}", &key[start..]),
        _ => "****".to_string(),
    }
}

/// Authentication provider trait.
///
/// Implementations add credentials to the query string of each request.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to the request query pairs.
    fn apply_auth(&self, query: &mut Vec<(String, String)>);

    /// Validate the credentials.
    fn validate(&self) -> Result<(), BrawlhallaError>;
}

/// API key authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, query: &mut Vec<(String, String)>) {
        query.retain(|(name, _)| name != API_KEY_PARAM);
        query.push((
            API_KEY_PARAM.to_string(),
            self.api_key.expose_secret().clone(),
        ));
    }

    fn validate(&self) -> Result<(), BrawlhallaError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(BrawlhallaError::configuration("API key cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
