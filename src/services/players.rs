//! Players service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::BrawlhallaResult;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::types::response::NormalizedResponse;

/// Player lookups.
pub struct PlayersService {
    pipeline: Arc<RequestPipeline>,
}

impl PlayersService {
    /// Creates a new players service.
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Resolves a Steam ID to the player's Brawlhalla ID and name.
    #[instrument(skip(self))]
    pub async fn search_by_steam_id(
        &self,
        steam_id: u64,
    ) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("players.search", "search").query("steamid", Some(steam_id));
        self.pipeline.execute(&endpoint).await
    }

    /// Fetches general statistics for a player.
    #[instrument(skip(self))]
    pub async fn stats(&self, brawlhalla_id: u64) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("players.stats", "player/{}/stats").arg(brawlhalla_id);
        self.pipeline.execute(&endpoint).await
    }

    /// Fetches ranked statistics for a player.
    #[instrument(skip(self))]
    pub async fn ranked(&self, brawlhalla_id: u64) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("players.ranked", "player/{}/ranked").arg(brawlhalla_id);
        self.pipeline.execute(&endpoint).await
    }
}

impl std::fmt::Debug for PlayersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayersService").finish_non_exhaustive()
    }
}
