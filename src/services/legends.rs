//! Legends service.

use std::sync::Arc;
use tracing::instrument;

use crate::errors::BrawlhallaResult;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::types::legend::{Legend, LegendRef};
use crate::types::response::NormalizedResponse;

/// Legend lookups.
pub struct LegendsService {
    pipeline: Arc<RequestPipeline>,
}

impl LegendsService {
    /// Creates a new legends service.
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetches one legend, addressed by [`Legend`] or by raw ID.
    #[instrument(skip(self, legend), fields(legend_id = tracing::field::Empty))]
    pub async fn get(
        &self,
        legend: impl Into<LegendRef>,
    ) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let id = legend.into().id();
        tracing::Span::current().record("legend_id", id);

        let endpoint = Endpoint::new("legends.get", "legend/{}").arg(id);
        self.pipeline.execute(&endpoint).await
    }

    /// Fetches one legend by raw provider ID.
    pub async fn get_by_id(&self, legend_id: u32) -> BrawlhallaResult<Option<NormalizedResponse>> {
        self.get(LegendRef::Raw(legend_id)).await
    }

    /// Fetches one catalogued legend.
    pub async fn get_by_legend(&self, legend: Legend) -> BrawlhallaResult<Option<NormalizedResponse>> {
        self.get(LegendRef::Symbolic(legend)).await
    }

    /// Fetches the summary list of every legend.
    #[instrument(skip(self))]
    pub async fn all(&self) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let endpoint = Endpoint::new("legends.all", "legend/all");
        self.pipeline.execute(&endpoint).await
    }
}

impl std::fmt::Debug for LegendsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegendsService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_symbolic_and_raw_ids_hit_same_path() {
        let (pipeline, transport) = test_support::pipeline();
        transport.queue_json(&json!({"legend_id": 3, "legend_name_key": "bodvar"}));
        transport.queue_json(&json!({"legend_id": 3, "legend_name_key": "bodvar"}));
        transport.queue_json(&json!({"legend_id": 99}));

        let service = LegendsService::new(pipeline);
        let bodvar = service.get_by_legend(Legend::Bodvar).await.unwrap().unwrap();
        service.get_by_id(3).await.unwrap();
        service.get(99u32).await.unwrap();

        assert_eq!(bodvar.get("legend_name_key").and_then(|v| v.as_str()), Some("bodvar"));
        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["legend/3", "legend/3", "legend/99"]);
    }

    #[tokio::test]
    async fn test_all_legends() {
        let (pipeline, transport) = test_support::pipeline();
        transport.queue_json(&json!([
            {"legend_id": 3, "legend_name_key": "bodvar"},
            {"legend_id": 4, "legend_name_key": "cassidy"}
        ]));

        let all = LegendsService::new(pipeline).all().await.unwrap().unwrap();

        assert_eq!(all.records().len(), 2);
        assert_eq!(transport.last_request().unwrap().path, "legend/all");
    }
}
