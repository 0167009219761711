use crate::core::RecipeRecord;
use crate::ranking::{NormalizedQuery, Scorer};

/// Minimum average rating for a recipe to be searchable
pub const MIN_RATING: f64 = 4.0;

/// Quality-gated substring scorer
///
/// Only recipes with at least one review and an average rating of
/// [`MIN_RATING`] or more are eligible. Eligible recipes match when the whole
/// query is a case-insensitive substring of the name, and are scored by
/// [`weighted_score`].
pub struct QualityGatedScorer {
    min_rating: f64,
}

impl QualityGatedScorer {
    pub fn new() -> Self {
        Self { min_rating: MIN_RATING }
    }
}

impl Default for QualityGatedScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rating damped by review volume: `rating * log10(reviews + 1)`
///
/// 4.8 stars over 2000 reviews scores ~15.8, 5.0 stars over 3 reviews ~3.0.
pub fn weighted_score(avg_rating: f64, n_reviews: u32) -> f64 {
    avg_rating * (f64::from(n_reviews) + 1.0).log10()
}

impl Scorer for QualityGatedScorer {
    fn score(&self, query: &NormalizedQuery, recipe: &RecipeRecord) -> Option<f64> {
        // Gate first: unrated or weak recipes are never matched
        if !self.qualifies(recipe) {
            return None;
        }

        if !recipe.name.to_lowercase().contains(query.text()) {
            return None;
        }

        Some(weighted_score(recipe.avg_rating, recipe.n_reviews))
    }

    fn qualifies(&self, recipe: &RecipeRecord) -> bool {
        recipe.n_reviews > 0 && recipe.avg_rating >= self.min_rating
    }

    fn name(&self) -> &str {
        "quality-gated"
    }
}
