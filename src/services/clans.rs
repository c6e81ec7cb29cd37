//! Clans service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::BrawlhallaResult;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::types::response::NormalizedResponse;

/// Clan lookups.
pub struct ClansService {
    pipeline: Arc<RequestPipeline>,
}

impl ClansService {
    /// Creates a new clans service.
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetches a clan and its member list.
    #[instrument(skip(self))]
    pub async fn get(&self, clan_id: u64) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("clans.get", "clan/{}").arg(clan_id);
        self.pipeline.execute(&endpoint).await
    }
}

impl std::fmt::Debug for ClansService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClansService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_clan_with_members() {
        let (pipeline, transport) = test_support::pipeline();
        transport.queue_json(&json!({
            "clan_id": 1,
            "clan_name": "Blue Mammoth Games",
            "clan": [
                {"brawlhalla_id": 2, "name": "bmg | dan", "rank": "Leader"},
                {"brawlhalla_id": 3, "name": "bmg | chill", "rank": "Officer"}
            ]
        }));

        let clan = ClansService::new(pipeline).get(1).await.unwrap().unwrap();
        let record = clan.as_record().unwrap();

        assert_eq!(record.get_str("clan_name"), Some("Blue Mammoth Games"));
        let ranks: Vec<_> = record
            .records("clan")
            .filter_map(|member| member.get_str("rank"))
            .collect();
        assert_eq!(ranks, vec!["Leader", "Officer"]);
        assert_eq!(transport.last_request().unwrap().path, "clan/1");
    }
}
