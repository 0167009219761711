use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogBuilder};
use crate::core::{Interaction, RecipeId, RecipeRecord};
use crate::error::{RecipeEngineError, Result};

const RECIPE_PROGRESS_EVERY: usize = 10_000;
const INTERACTION_PROGRESS_EVERY: usize = 50_000;

/// Loads the recipe catalog from CSV exports
///
/// The recipes file is mapped by header name, so both the Food.com
/// `RAW_recipes.csv` layout (`name,id,minutes,...,ingredients`) and the
/// scraped layout (`recipe_name,prep_time,...,cuisine_path,img_src`) load.
/// Interactions (`user_id,recipe_id,date,rating,review`) are optional and
/// supply the rating statistics.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    recipes_path: PathBuf,
    interactions_path: Option<PathBuf>,
}

impl CsvLoader {
    pub fn new(recipes_path: impl Into<PathBuf>) -> Self {
        Self {
            recipes_path: recipes_path.into(),
            interactions_path: None,
        }
    }

    /// Also read ratings from an interactions file
    pub fn with_interactions(mut self, path: impl Into<PathBuf>) -> Self {
        self.interactions_path = Some(path.into());
        self
    }

    /// Read both files and freeze the catalog
    pub fn load(&self) -> Result<Catalog> {
        tracing::info!("Loading recipes from {}", self.recipes_path.display());
        let mut builder = Catalog::builder();
        let rows = load_recipes(&self.recipes_path, &mut builder)?;
        tracing::info!("Total recipes loaded: {} ({} rows accepted)", builder.len(), rows);

        if let Some(path) = &self.interactions_path {
            tracing::info!("Loading interactions from {}", path.display());
            let applied = load_interactions(path, &mut builder)?;
            tracing::info!("Total interactions loaded: {}", applied);
        }

        Ok(builder.build())
    }
}

/// Column positions resolved from the recipes header
#[derive(Debug)]
struct RecipeColumns {
    name: usize,
    id: Option<usize>,
    minutes: Option<usize>,
    prep_time: Option<usize>,
    cook_time: Option<usize>,
    total_time: Option<usize>,
    description: Option<usize>,
    ingredients: Option<usize>,
    steps: Option<usize>,
    tags: Option<usize>,
    category: Option<usize>,
    image: Option<usize>,
    url: Option<usize>,
    rating: Option<usize>,
    reviews: Option<usize>,
}

impl RecipeColumns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
        };

        let name = find(&["name", "recipe_name", "title"]).ok_or_else(|| {
            RecipeEngineError::Config("recipes file has no name column".to_string())
        })?;

        Ok(Self {
            name,
            id: find(&["id", "recipe_id"]),
            minutes: find(&["minutes"]),
            prep_time: find(&["prep_time"]),
            cook_time: find(&["cook_time"]),
            total_time: find(&["total_time"]),
            description: find(&["description"]),
            ingredients: find(&["ingredients"]),
            steps: find(&["steps", "directions"]),
            tags: find(&["tags"]),
            category: find(&["cuisine_path", "category", "cuisine"]),
            image: find(&["img_src", "image", "image_url"]),
            url: find(&["url"]),
            rating: find(&["rating", "avg_rating"]),
            reviews: find(&["n_reviews", "review_count"]),
        })
    }
}

fn field(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn load_recipes(path: &Path, builder: &mut CatalogBuilder) -> Result<usize> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = RecipeColumns::resolve(reader.headers()?)?;
    let mut loaded = 0;

    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping malformed recipe record at line {}: {}", line, e);
                continue;
            }
        };

        match parse_recipe(&record, &columns, row as RecipeId + 1) {
            Some(recipe) => {
                builder.insert(recipe);
                loaded += 1;
            }
            None => {
                tracing::warn!("Skipping recipe record at line {}: missing name or invalid id", line);
                continue;
            }
        }

        if loaded % RECIPE_PROGRESS_EVERY == 0 {
            tracing::debug!("Loaded {} recipes...", loaded);
        }
    }

    Ok(loaded)
}

fn parse_recipe(record: &StringRecord, columns: &RecipeColumns, row_id: RecipeId) -> Option<RecipeRecord> {
    let name = record.get(columns.name)?.trim();
    if name.is_empty() {
        return None;
    }

    let id = match columns.id {
        Some(_) => field(record, columns.id).parse::<RecipeId>().ok()?,
        None => row_id,
    };

    let mut recipe = RecipeRecord::new(id, name);
    recipe.description = field(record, columns.description).to_string();
    recipe.prep_time = field(record, columns.prep_time).to_string();
    recipe.cook_time = field(record, columns.cook_time).to_string();
    recipe.total_time = field(record, columns.total_time).to_string();
    recipe.minutes = match columns.minutes {
        Some(_) => field(record, columns.minutes).parse().unwrap_or(0),
        None => parse_duration_minutes(&recipe.total_time),
    };
    recipe.ingredients = parse_list_field(field(record, columns.ingredients));
    recipe.steps = parse_steps(field(record, columns.steps));
    recipe.tags = parse_list_field(field(record, columns.tags));
    recipe.category = field(record, columns.category).to_string();
    if recipe.category.is_empty() && !recipe.tags.is_empty() {
        recipe.category = recipe.tags.join("/");
    }
    recipe.image_src = field(record, columns.image).to_string();
    recipe.url = field(record, columns.url).to_string();
    recipe.avg_rating = field(record, columns.rating).parse().unwrap_or(0.0);
    recipe.n_reviews = field(record, columns.reviews).parse().unwrap_or(0);

    Some(recipe)
}

fn load_interactions(path: &Path, builder: &mut CatalogBuilder) -> Result<usize> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str, fallback: usize| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .unwrap_or(fallback)
    };
    let (user_col, recipe_col, date_col, rating_col, review_col) = (
        column("user_id", 0),
        column("recipe_id", 1),
        column("date", 2),
        column("rating", 3),
        column("review", 4),
    );

    let mut applied = 0;
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping malformed interaction record at line {}: {}", line, e);
                continue;
            }
        };

        let get = |i: usize| record.get(i).unwrap_or("").trim();
        let interaction = match (
            get(user_col).parse::<u64>(),
            get(recipe_col).parse::<RecipeId>(),
            get(rating_col).parse::<u32>(),
        ) {
            (Ok(user_id), Ok(recipe_id), Ok(rating)) => Interaction {
                user_id,
                recipe_id,
                date: get(date_col).to_string(),
                rating,
                review: get(review_col).to_string(),
            },
            _ => {
                tracing::warn!("Skipping interaction at line {}: invalid user id, recipe id or rating", line);
                continue;
            }
        };

        if builder.record_rating(interaction.recipe_id, interaction.rating) {
            applied += 1;
        }

        if (row + 1) % INTERACTION_PROGRESS_EVERY == 0 {
            tracing::debug!("Loaded {} interactions...", row + 1);
        }
    }

    Ok(applied)
}

/// Split a list stored as text
///
/// Accepts Python list literals (`['a', 'b']`) and plain comma-separated text.
pub fn parse_list_field(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with('[') && raw.ends_with(']') {
        let inner = raw.trim_matches(|c: char| c == '[' || c == ']');
        return inner
            .split("', '")
            .flat_map(|item| item.split("\", \""))
            .map(|item| item.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
    }

    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Steps are either a list literal or one instruction per line
fn parse_steps(raw: &str) -> Vec<String> {
    if raw.starts_with('[') {
        return parse_list_field(raw);
    }
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse durations like "1 hrs 10 mins" or "45 mins" into minutes
///
/// Unknown or out-of-range durations yield 0.
pub fn parse_duration_minutes(raw: &str) -> u32 {
    let mut total: u32 = 0;
    let mut pending: Option<u32> = None;

    for word in raw.split_whitespace() {
        let word = word.to_ascii_lowercase();
        if let Ok(n) = word.parse::<u32>() {
            pending = Some(n);
            continue;
        }
        let Some(n) = pending.take() else { continue };
        let minutes = if word.starts_with("day") {
            n.checked_mul(24 * 60)
        } else if word.starts_with('h') {
            n.checked_mul(60)
        } else if word.starts_with("min") {
            Some(n)
        } else {
            Some(0)
        };

        match minutes.and_then(|m| total.checked_add(m)) {
            Some(sum) => total = sum,
            None => return 0,
        }
    }

    total
}
