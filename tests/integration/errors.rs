//! Integration tests for the error policy

use super::*;
use brawlhalla_client::BrawlhallaError;
use std::time::Duration;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_not_found_propagated() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/player/1/ranked")
        .respond_with(error_response(404, "Player not found"))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let err = client.players().ranked(1).await.unwrap_err();

    match err {
        BrawlhallaError::Upstream {
            status,
            reason,
            detail,
        } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(detail, "Player not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_suppressed() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/clan/404")
        .respond_with(error_response(404, "Clan not found"))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server)
        .propagate_errors(false)
        .build()
        .unwrap();

    assert!(client.clans().get(404).await.unwrap().is_none());
    assert_eq!(client.metrics().upstream_errors, 1);
}

#[tokio::test]
async fn test_rate_limited_response_swallowed() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/player/2/stats")
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();

    assert!(client.players().stats(2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rate_limited_response_surfaced() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/player/2/stats")
        .respond_with(error_response(429, "Too many requests"))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server)
        .swallow_rate_limit(false)
        .build()
        .unwrap();
    let err = client.players().stats(2).await.unwrap_err();

    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_rate_limited_then_retried() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/legend/3")
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mock_with_auth("/legend/3")
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "legend_id": 3
        })))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server)
        .retry_on_rate_limit(true)
        .retry_delay(Duration::from_millis(50))
        .build()
        .unwrap();

    let legend = client.legends().get_by_id(3).await.unwrap();

    assert!(legend.is_some());
    assert_eq!(client.metrics().retries, 1);
}

#[tokio::test]
async fn test_timeout_swallowed_even_when_propagating() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/clan/1")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"clan_id": 1}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server)
        .timeout(Duration::from_millis(200))
        .propagate_errors(true)
        .build()
        .unwrap();

    assert!(client.clans().get(1).await.unwrap().is_none());
    assert_eq!(client.metrics().timeouts, 1);
}

#[tokio::test]
async fn test_malformed_success_body() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/legend/3")
        .respond_with(ResponseTemplate::new(200).set_body_string("\"just a string\""))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server)
        .propagate_errors(false)
        .build()
        .unwrap();
    let err = client.legends().get_by_id(3).await.unwrap_err();

    assert!(matches!(err, BrawlhallaError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_non_loopback_http_rejected() {
    let result = BrawlhallaClient::builder()
        .api_key(TEST_API_KEY)
        .base_url("http://api.brawlhalla.com")
        .build();

    assert!(matches!(result, Err(BrawlhallaError::Configuration { .. })));
}
