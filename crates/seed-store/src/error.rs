//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use seed_core::EntityId;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity with this id exists.
    #[error("Entity not found: {id}")]
    NotFound { id: EntityId },

    /// A lookup that must be unique matched several entities.
    #[error("{count} {entity_type} entities match {field} = {value}")]
    Ambiguous {
        entity_type: String,
        field: String,
        value: String,
        count: usize,
    },

    /// The entity being persisted belongs to a different type than the stored one.
    #[error("Entity {id} is a {stored}, not a {given}")]
    TypeMismatch {
        id: EntityId,
        stored: String,
        given: String,
    },

    /// Reading or writing the JSONL snapshot failed.
    #[error("Snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
