use serde::{Deserialize, Serialize};

/// Primary key of a recipe in the catalog
pub type RecipeId = u64;

/// A recipe with display metadata and its aggregated rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRecord {
    /// Unique recipe identifier
    pub id: RecipeId,

    /// Recipe title, matched against queries and used as the dedup key
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Total time in minutes (0 when unknown)
    #[serde(default)]
    pub minutes: u32,

    /// Free-form timing fields as published by the source
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub total_time: String,

    /// Ingredients, in source order
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Preparation steps
    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Cuisine/category path (e.g. "/Desserts/Pies/Apple Pie Recipes/")
    #[serde(default)]
    pub category: String,

    /// Image reference, passed through untouched by the core
    #[serde(default)]
    pub image_src: String,

    /// Source page URL
    #[serde(default)]
    pub url: String,

    /// Quality signal on a 0-5 scale
    #[serde(default)]
    pub avg_rating: f64,

    /// Number of observed reviews
    #[serde(default)]
    pub n_reviews: u32,
}

impl RecipeRecord {
    /// Create a new record with required fields
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            minutes: 0,
            prep_time: String::new(),
            cook_time: String::new(),
            total_time: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
            category: String::new(),
            image_src: String::new(),
            url: String::new(),
            avg_rating: 0.0,
            n_reviews: 0,
        }
    }

    /// Set the quality signal and review count
    pub fn with_rating(mut self, avg_rating: f64, n_reviews: u32) -> Self {
        self.avg_rating = avg_rating;
        self.n_reviews = n_reviews;
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Quality signal used by the scorers
    pub fn quality(&self) -> f64 {
        self.avg_rating
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        if self.n_reviews > 0 {
            format!("{} ({:.1}★, {} reviews)", self.name, self.avg_rating, self.n_reviews)
        } else {
            self.name.clone()
        }
    }
}

/// A single user rating of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub user_id: u64,
    pub recipe_id: RecipeId,
    #[serde(default)]
    pub date: String,
    pub rating: u32,
    #[serde(default)]
    pub review: String,
}
