use std::sync::Arc;
use std::time::Instant;

use crate::catalog::{Catalog, CsvLoader};
use crate::config::EngineConfig;
use crate::core::SearchResponse;
use crate::error::Result;
use crate::ranking::{Ranker, ScoredCandidate, ScoringPolicy};
use crate::stats::CatalogStats;

/// Main recipe search orchestrator
///
/// Owns the immutable catalog and the ranker built for one scoring policy.
/// Every method takes `&self`; wrap the engine in an `Arc` to share it.
pub struct RecipeEngine {
    catalog: Arc<Catalog>,
    ranker: Ranker,
    policy: ScoringPolicy,
}

impl RecipeEngine {
    /// Create an engine over an already built catalog
    pub fn new(catalog: Catalog, policy: ScoringPolicy) -> Self {
        let catalog = Arc::new(catalog);
        let ranker = Ranker::new(catalog.clone(), policy.scorer());
        tracing::info!("Recipe engine ready: {} recipes, {} scoring", catalog.len(), policy);

        Self { catalog, ranker, policy }
    }

    /// Load the catalog from CSV as configured
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let start = Instant::now();

        let mut loader = CsvLoader::new(&config.recipes_path);
        if let Some(path) = &config.interactions_path {
            loader = loader.with_interactions(path);
        }
        let catalog = loader.load()?;

        tracing::info!("Catalog loaded in {:.1}s", start.elapsed().as_secs_f64());

        let mut engine = Self::new(catalog, config.policy);
        engine.ranker = engine.ranker.with_max_results(config.max_results);
        Ok(engine)
    }

    /// Search the catalog. Blank queries yield an empty response.
    pub fn search(&self, query: &str) -> SearchResponse {
        SearchResponse::new(query, self.ranker.search(query))
    }

    /// Ranked candidates with their scores, for diagnostics
    pub fn search_scored(&self, query: &str) -> Vec<ScoredCandidate<'_>> {
        self.ranker.search_scored(query)
    }

    /// Catalog counts under the active quality predicate
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(&self.catalog, self.ranker.scorer())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn policy_name(&self) -> &str {
        self.ranker.scorer().name()
    }
}
