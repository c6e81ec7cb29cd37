//! Integration tests using WireMock
//!
//! These run the full client against a local mock server: URL construction,
//! query authentication, the reqwest transport, response classification and
//! the error policy.

mod errors;
mod players;
mod rankings;

use brawlhalla_client::{BrawlhallaClient, BrawlhallaClientBuilder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Helper to create a GET mock that requires the API key query parameter
pub fn mock_with_auth(path_matcher: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(path_matcher))
        .and(query_param("api_key", TEST_API_KEY))
}

/// Helper to create error response templates in the provider's envelope
pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "error": {"code": status, "message": message}
    }))
}

/// Helper to create a client builder pointed at the mock server
pub fn client_builder(server: &MockServer) -> BrawlhallaClientBuilder {
    BrawlhallaClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
}
