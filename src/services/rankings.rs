//! Rankings service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::BrawlhallaResult;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::types::rankings::{Bracket, Region};
use crate::types::response::NormalizedResponse;

/// Leaderboard pages.
pub struct RankingsService {
    pipeline: Arc<RequestPipeline>,
}

impl RankingsService {
    /// Creates a new rankings service.
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetches one leaderboard page, optionally filtered by player name.
    ///
    /// The page number is passed through unchanged and the provider decides
    /// how it is interpreted. A successful response is a list of records.
    #[instrument(skip(self, bracket, region), fields(bracket = bracket.as_str(), region = region.as_str()))]
    pub async fn page(
        &self,
        bracket: Bracket,
        region: Region,
        page: u32,
        name: Option<&str>,
    ) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("rankings.page", "rankings/{}/{}/{}")
            .arg(bracket)
            .arg(region)
            .arg(page)
            .query("name", name);
        self.pipeline.execute(&endpoint).await
    }
}

impl std::fmt::Debug for RankingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingsService").finish_non_exhaustive()
    }
}
