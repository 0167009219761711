pub mod loader;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::core::{RecipeId, RecipeRecord};

pub use loader::CsvLoader;

/// Immutable recipe catalog, built once at startup
///
/// Records are kept in ascending identifier order, so every scan visits them
/// in the same order. There is no way to mutate a `Catalog` once built; share
/// it behind an `Arc` and read it from as many threads as needed.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<RecipeRecord>,
    index: HashMap<RecipeId, usize>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Start building a catalog
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Build a catalog directly from finished records
    pub fn from_records(records: impl IntoIterator<Item = RecipeRecord>) -> Self {
        let mut builder = Self::builder();
        for record in records {
            builder.insert(record);
        }
        builder.build()
    }

    pub fn empty() -> Self {
        Self::builder().build()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: RecipeId) -> Option<&RecipeRecord> {
        self.index.get(&id).map(|&i| &self.recipes[i])
    }

    /// All records, ordered by identifier
    pub fn recipes(&self) -> &[RecipeRecord] {
        &self.recipes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecipeRecord> {
        self.recipes.iter()
    }

    /// When the catalog finished loading
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a RecipeRecord;
    type IntoIter = std::slice::Iter<'a, RecipeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

/// Accumulates records and ratings during the load phase
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    recipes: HashMap<RecipeId, RecipeRecord>,
    /// Observed (rating sum, review count) per recipe
    ratings: HashMap<RecipeId, (u64, u32)>,
    orphan_ratings: u64,
}

impl CatalogBuilder {
    /// Add a record. A later record with the same id replaces the earlier one.
    pub fn insert(&mut self, record: RecipeRecord) -> &mut Self {
        if let Some(previous) = self.recipes.insert(record.id, record) {
            tracing::warn!("Duplicate recipe id {} ('{}' replaced)", previous.id, previous.name);
        }
        self
    }

    /// Accumulate one observed rating. Returns false when the recipe is unknown.
    pub fn record_rating(&mut self, recipe_id: RecipeId, rating: u32) -> bool {
        if !self.recipes.contains_key(&recipe_id) {
            self.orphan_ratings += 1;
            return false;
        }

        let (sum, count) = self.ratings.entry(recipe_id).or_default();
        *sum += u64::from(rating);
        *count += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Finalize averages and freeze the catalog
    pub fn build(self) -> Catalog {
        if self.orphan_ratings > 0 {
            tracing::warn!("Ignored {} ratings for unknown recipes", self.orphan_ratings);
        }

        let ratings = self.ratings;
        let mut recipes: Vec<RecipeRecord> = self
            .recipes
            .into_values()
            .map(|mut recipe| {
                // Recipes without observed reviews keep any precomputed rating
                if let Some(&(sum, count)) = ratings.get(&recipe.id) {
                    recipe.avg_rating = sum as f64 / f64::from(count);
                    recipe.n_reviews = count;
                }
                recipe
            })
            .collect();
        recipes.sort_by_key(|r| r.id);

        let index = recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();

        let catalog = Catalog {
            recipes,
            index,
            loaded_at: Utc::now(),
        };
        tracing::info!("Catalog built with {} recipes", catalog.len());
        catalog
    }
}
