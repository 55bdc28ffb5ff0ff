//! Error types for rig-insight

use std::io;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the performance estimation engine.
///
/// Catalog lookup misses are deliberately *not* errors: an unknown
/// component name yields empty results through the whole pipeline
/// (see [`crate::benchmarks::BenchmarkLookup`]). Variants here cover
/// contract violations and bad reference data only.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (dataset or build-config file access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caller omitted a structurally mandatory argument
    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    /// Component spec carries an invalid attribute value
    #[error("Invalid component spec: {0}")]
    InvalidSpec(String),

    /// Reference dataset failed to load or violates its invariants
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error (build config file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
