//! # Recipe Search Engine
//!
//! In-memory recipe search with:
//! - CSV catalog loading (Food.com and scraped recipe layouts)
//! - Immutable catalog shared lock-free across requests
//! - Two scoring policies: quality-gated substring match and weighted fuzzy match
//! - Name deduplication, near-tie ordering and top-20 truncation
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust
//! use recipe_search_engine::{Catalog, RecipeEngine, RecipeRecord, ScoringPolicy};
//!
//! let catalog = Catalog::from_records([
//!     RecipeRecord::new(1, "Chicken Soup").with_rating(4.5, 10),
//!     RecipeRecord::new(2, "Beef Stew").with_rating(3.0, 5),
//! ]);
//! let engine = RecipeEngine::new(catalog, ScoringPolicy::QualityGated);
//!
//! let response = engine.search("chicken");
//! assert_eq!(response.count, 1);
//! assert_eq!(response.recipes[0].name, "Chicken Soup");
//! ```

pub mod core;
pub mod catalog;
pub mod ranking;
pub mod stats;
pub mod proxy;
pub mod config;
pub mod engine;
pub mod error;

// Re-export primary types
pub use self::core::{Interaction, RecipeId, RecipeRecord, SearchResponse};
pub use catalog::{Catalog, CatalogBuilder, CsvLoader};
pub use ranking::{NormalizedQuery, Ranker, ScoredCandidate, Scorer, ScoringPolicy};
pub use stats::CatalogStats;
pub use config::{EngineConfig, ServerConfig};
pub use engine::RecipeEngine;
pub use error::{RecipeEngineError, Result};

// HTTP boundary
#[cfg(feature = "server")]
pub mod server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
