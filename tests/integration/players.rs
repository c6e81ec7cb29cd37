//! Integration tests for player and clan lookups

use super::*;
use brawlhalla_client::Legend;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::query_param;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_player_stats_integration() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/player/2/stats")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "brawlhalla_id": 2,
            "name": "bmg | dan",
            "xp": 326000,
            "legends": [
                {"legend_id": 3, "legend_name_key": "bodvar", "games": 12}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let player = client.players().stats(2).await.unwrap().unwrap();
    let record = player.as_record().unwrap();

    assert_eq!(record.get_str("name"), Some("bmg | dan"));
    assert_eq!(record.get_i64("xp"), Some(326000));
    let keys: Vec<_> = record
        .records("legends")
        .filter_map(|legend| legend.get_str("legend_name_key"))
        .collect();
    assert_eq!(keys, vec![Legend::Bodvar.key()]);
}

#[tokio::test]
async fn test_search_by_steam_id_integration() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/search")
        .and(query_param("steamid", "76561198025185087"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "brawlhalla_id": 2,
            "name": "bmg | dan"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let found = client
        .players()
        .search_by_steam_id(76561198025185087)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.get("brawlhalla_id").and_then(|v| v.as_u64()), Some(2));
}

#[tokio::test]
async fn test_double_encoded_names_are_repaired() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/clan/1")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clan_id": 1,
            "clan_name": "\u{00c3}\u{0091}ato",
            "clan": [{"brawlhalla_id": 9, "name": "\u{00c3}\u{00a9}clair"}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let clan = client.clans().get(1).await.unwrap().unwrap();
    let record = clan.as_record().unwrap();

    assert_eq!(record.get_str("clan_name"), Some("Ñato"));
    let member = record.records("clan").next().unwrap();
    assert_eq!(member.get_str("name"), Some("éclair"));
}

#[tokio::test]
async fn test_legend_catalog_integration() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/legend/all")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"legend_id": 3, "legend_name_key": "bodvar"},
            {"legend_id": 4, "legend_name_key": "cassidy"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_builder(&mock_server).build().unwrap();
    let legends = client.legends().all().await.unwrap().unwrap();

    let ids: Vec<_> = legends
        .records()
        .iter()
        .filter_map(|legend| legend.get_u64("legend_id"))
        .collect();
    assert_eq!(ids, vec![3, 4]);
}
