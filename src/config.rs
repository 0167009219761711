use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::ranking::{ScoringPolicy, DEFAULT_MAX_RESULTS};

pub const DEFAULT_RECIPES_CSV: &str = "RAW_recipes.csv";
pub const DEFAULT_INTERACTIONS_CSV: &str = "RAW_interactions.csv";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Where the catalog comes from and how it is ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub recipes_path: PathBuf,

    /// Ratings source; `None` keeps whatever ratings the recipes file carries
    pub interactions_path: Option<PathBuf>,

    pub policy: ScoringPolicy,

    pub max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recipes_path: PathBuf::from(DEFAULT_RECIPES_CSV),
            interactions_path: Some(PathBuf::from(DEFAULT_INTERACTIONS_CSV)),
            policy: ScoringPolicy::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Public base URL of the image proxy; `None` uses the server's own `/img`
    pub image_proxy_base: Option<String>,

    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            image_proxy_base: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (`PORT`, `HOST`, `RECIPES_CSV`,
    /// `INTERACTIONS_CSV`, `SCORING_POLICY`, `IMAGE_PROXY_BASE`)
    ///
    /// An empty `INTERACTIONS_CSV` disables the interactions file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let interactions_path = match lookup("INTERACTIONS_CSV") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => defaults.engine.interactions_path,
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            image_proxy_base: lookup("IMAGE_PROXY_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .filter(|base| !base.is_empty()),
            engine: EngineConfig {
                recipes_path: lookup("RECIPES_CSV")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.engine.recipes_path),
                interactions_path,
                policy: parse_or("SCORING_POLICY", lookup("SCORING_POLICY"), defaults.engine.policy),
                max_results: defaults.engine.max_results,
            },
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Prefix that proxied image URLs are built on
    pub fn image_proxy_prefix(&self) -> String {
        match &self.image_proxy_base {
            Some(base) => format!("{}/img?url=", base),
            None => "/img?url=".to_string(),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}='{}', using default", key, raw);
                default
            }
        },
        None => default,
    }
}
