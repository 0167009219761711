use serde::{Deserialize, Serialize};
use crate::core::RecipeRecord;

/// Search response handed to the boundary layer for serialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Ranked recipes, best first
    pub recipes: Vec<RecipeRecord>,

    /// Number of recipes returned
    pub count: usize,

    /// The query as received
    pub query: String,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(query: impl Into<String>, recipes: Vec<RecipeRecord>) -> Self {
        Self {
            count: recipes.len(),
            recipes,
            query: query.into(),
        }
    }

    /// Response for a query that matched nothing
    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Rewrite every non-empty image reference with `rewrite`
    pub fn map_images(mut self, rewrite: impl Fn(&str) -> String) -> Self {
        for recipe in &mut self.recipes {
            if !recipe.image_src.is_empty() {
                recipe.image_src = rewrite(&recipe.image_src);
            }
        }
        self
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        match self.recipes.first() {
            Some(top) => format!("'{}' → {} results, top: {}", self.query, self.count, top.display_name()),
            None => format!("'{}' → no results", self.query),
        }
    }
}
