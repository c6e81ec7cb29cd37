//! Integration tests for leaderboard pages

use super::*;
use brawlhalla_client::{Bracket, Region};
use serde_json::json;
use wiremock::matchers::query_param;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_rankings_page_with_name_integration() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/rankings/2v2/us-e/1")
        .and(query_param("name", "Dan & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"rank": "1", "teamname": "Dan+Co", "rating": 2400},
            {"rank": "2", "teamname": "Other", "rating": 2350}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let page = client
        .rankings()
        .page(Bracket::TwoVTwo, Region::UsEast, 1, Some("Dan & Co"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(page.records().len(), 2);
    assert_eq!(page.records()[0].get_i64("rating"), Some(2400));
    assert_eq!(page.records()[0].get_i64("rank"), Some(1));
}
