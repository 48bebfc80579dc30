//! Value-model error types.
//!
//! Domain-specific errors (`StoreError`, `LoadError`, `ConfigError`) live in
//! their respective crates. The CLI converges all of them into `anyhow::Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A value that must be a mapping was something else.
    #[error("Expected a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}
