//! Error types for the scenario harness
//!
//! Every step failure is terminal for its scenario: the runner wraps the
//! cause in [`Error::Step`] with the step index and kind so the failing
//! point is visible in test output without further digging.

use std::io;
use thiserror::Error;

use crate::scenario::StepKind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenario harness
#[derive(Error, Debug)]
pub enum Error {
    // === Element Resolution Errors ===
    #[error("no element matches {0}")]
    ElementNotFound(String),

    #[error("{locator} matches {count} elements where exactly one is required")]
    AmbiguousSelector { locator: String, count: usize },

    // === Navigation Errors ===
    #[error("navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {0} seconds waiting for navigation")]
    Timeout(u64),

    // === Assertion Errors ===
    #[error("assertion failed: expected {expected}, got '{actual}'")]
    Assertion { expected: String, actual: String },

    #[error("assert step has no preceding extract to compare against")]
    NothingExtracted,

    // === Step Context ===
    #[error("step {index} ({kind}): {source}")]
    Step {
        index: usize,
        kind: StepKind,
        #[source]
        source: Box<Error>,
    },

    // === Browser/Transport Errors ===
    #[error("browser error: {0}")]
    Browser(String),

    #[error("unexpected value from page evaluation: {0}")]
    Evaluation(String),

    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid scenario '{path}': {reason}")]
    ScenarioParse { path: String, reason: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a step failure with its position and kind
    pub fn at_step(self, index: usize, kind: StepKind) -> Self {
        Self::Step {
            index,
            kind,
            source: Box::new(self),
        }
    }

    /// Create a navigation error
    pub fn navigation(url: &str, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &str, reason: impl Into<String>) -> Self {
        Self::ScenarioParse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
