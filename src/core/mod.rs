pub mod recipe;
pub mod search_response;

pub use recipe::{Interaction, RecipeId, RecipeRecord};
pub use search_response::SearchResponse;
