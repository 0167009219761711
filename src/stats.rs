use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::ranking::Scorer;

/// Catalog-wide counts for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of recipes in the catalog
    pub total_recipes: usize,

    /// Recipes meeting the active scorer's quality predicate
    pub recipes_with_rating: usize,
}

impl CatalogStats {
    /// Count the catalog against the scorer's quality predicate
    pub fn collect(catalog: &Catalog, scorer: &dyn Scorer) -> Self {
        Self {
            total_recipes: catalog.len(),
            recipes_with_rating: catalog.iter().filter(|r| scorer.qualifies(r)).count(),
        }
    }

    /// Share of qualifying recipes, 0.0 for an empty catalog
    pub fn qualifying_ratio(&self) -> f64 {
        if self.total_recipes == 0 {
            0.0
        } else {
            self.recipes_with_rating as f64 / self.total_recipes as f64
        }
    }
}
