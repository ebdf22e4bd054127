//! Configuration errors
//!
//! Nothing here is fatal to the page: a `ConfigError` only leaves the game
//! unable to start, with a status message explaining why.

use thiserror::Error;

/// Failure to obtain a usable difficulty registry
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The request never completed (network, CORS, missing window)
    #[error("failed to fetch difficulty config: {0}")]
    Fetch(String),
    /// The server answered with a non-success status
    #[error("difficulty config request returned HTTP {0}")]
    HttpStatus(u16),
    /// The body was not valid JSON
    #[error("difficulty config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but is not a key -> preset object
    #[error("difficulty config must be a JSON object keyed by difficulty")]
    NotAnObject,
    /// No usable presets in the document
    #[error("difficulty config contains no presets")]
    Empty,
}
