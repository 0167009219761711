pub mod fuzzy;
pub mod quality_gate;
pub mod query;
pub mod ranker;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::RecipeRecord;
use crate::error::RecipeEngineError;

pub use fuzzy::WeightedFuzzyScorer;
pub use quality_gate::QualityGatedScorer;
pub use query::NormalizedQuery;
pub use ranker::{Ranker, DEFAULT_MAX_RESULTS};

/// Trait for relevance scoring policies
pub trait Scorer: Send + Sync {
    /// Score a recipe against the query. `None` means the recipe is excluded.
    fn score(&self, query: &NormalizedQuery, recipe: &RecipeRecord) -> Option<f64>;

    /// Quality predicate shared with the catalog stats
    fn qualifies(&self, recipe: &RecipeRecord) -> bool;

    /// Whether results sharing an exact name collapse to the first one
    fn dedupes_by_name(&self) -> bool {
        false
    }

    /// Scores closer than this are ordered by quality instead of score
    fn near_tie_band(&self) -> Option<f64> {
        None
    }

    /// Get scorer name for logging
    fn name(&self) -> &str;
}

/// Recipe with its relevance score, alive for a single search
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub recipe: &'a RecipeRecord,
    pub score: f64,
}

impl<'a> ScoredCandidate<'a> {
    pub fn new(recipe: &'a RecipeRecord, score: f64) -> Self {
        Self { recipe, score }
    }

    pub fn quality(&self) -> f64 {
        self.recipe.quality()
    }
}

/// Named scoring strategies, selected when the engine is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// Rated recipes only, name substring match, rating × log10(reviews + 1)
    #[default]
    QualityGated,
    /// Additive multi-field bonuses with fuzzy name similarity
    WeightedFuzzy,
}

impl ScoringPolicy {
    /// Instantiate the scorer for this policy
    pub fn scorer(self) -> Arc<dyn Scorer> {
        match self {
            ScoringPolicy::QualityGated => Arc::new(QualityGatedScorer::new()),
            ScoringPolicy::WeightedFuzzy => Arc::new(WeightedFuzzyScorer::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoringPolicy::QualityGated => "quality-gated",
            ScoringPolicy::WeightedFuzzy => "weighted-fuzzy",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringPolicy {
    type Err = RecipeEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality-gated" | "quality_gated" | "quality" | "a" => Ok(ScoringPolicy::QualityGated),
            "weighted-fuzzy" | "weighted_fuzzy" | "fuzzy" | "b" => Ok(ScoringPolicy::WeightedFuzzy),
            other => Err(RecipeEngineError::Config(format!("unknown scoring policy '{}'", other))),
        }
    }
}
