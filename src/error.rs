use thiserror::Error;

/// Main error type for the recipe engine
#[derive(Error, Debug)]
pub enum RecipeEngineError {
    /// Filesystem errors (opening catalog files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream answered with a non-success status
    #[error("Upstream '{url}' returned HTTP {status}")]
    Upstream { status: u16, url: String },

    /// Caller sent an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for RecipeEngineError {
    fn from(s: String) -> Self {
        RecipeEngineError::Other(s)
    }
}

impl From<&str> for RecipeEngineError {
    fn from(s: &str) -> Self {
        RecipeEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RecipeEngineError>;
