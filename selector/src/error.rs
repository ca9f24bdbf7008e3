//! Error types.
//!
//! The widget itself never fails: missing attributes resolve to empty values
//! and render-target problems are logged. These errors cover loading options
//! and records from JSON.

use thiserror::Error;

/// Selector error type.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
