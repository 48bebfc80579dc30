//! Engine error types.
//!
//! Every variant except [`LoadError::MissingFile`] is fatal to the loader that
//! raised it: the loader stops, records already reconciled stay committed, and
//! later loaders still run unless `fail_fast` is set.

use std::path::PathBuf;

use thiserror::Error;

use seed_store::StoreError;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The loader's data file does not exist. Not fatal: nothing to load.
    #[error("Data file {path} not found")]
    MissingFile { path: PathBuf },

    /// The data file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid YAML.
    #[error("Invalid YAML in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document is neither a mapping nor a sequence.
    #[error("Invalid data in {file} - expected a mapping or a sequence, found {found}")]
    InvalidFormat { file: String, found: &'static str },

    /// One entry of the document has an unusable shape.
    #[error("Invalid record #{index} in {file}: {reason}")]
    InvalidRecord {
        file: String,
        index: usize,
        reason: String,
    },

    /// None of the loader's unique fields is present, so there is nothing to
    /// find or create by.
    #[error("{loader}: record has none of the unique fields {unique_fields:?}")]
    NoIdentity {
        loader: String,
        unique_fields: Vec<String>,
    },

    /// A required association field is absent from the record.
    #[error("{loader}: required association '{field}' is missing")]
    RequiredAssociationMissing { loader: String, field: String },

    /// An association value matched no entity.
    #[error("{loader}: {field} references {target} with {lookup} = {value}, which does not exist")]
    AssociationNotFound {
        loader: String,
        field: String,
        target: String,
        lookup: String,
        value: String,
    },

    /// Custom field keys with no registered descriptor. Lists every offending key.
    #[error(
        "⚠️ Custom field(s) {keys:?} requested for {entity_type} but not found! Please check the custom_fields data file"
    )]
    UnknownAttributes {
        loader: String,
        entity_type: String,
        keys: Vec<String>,
        /// Keys that exist but are not enabled for `entity_type`, found in the same pass.
        disabled: Vec<String>,
    },

    /// Custom field keys registered but not enabled for the entity type.
    #[error(
        "⚠️ Custom field(s) {keys:?} are not enabled for {entity_type}! Please check 'on_objects' for those custom fields"
    )]
    AttributesNotEnabled {
        loader: String,
        entity_type: String,
        keys: Vec<String>,
    },

    /// A loader name not present in the registry.
    #[error("Unknown loader '{name}'")]
    UnknownLoader { name: String },

    /// Declared associations form a cycle, so no valid order exists.
    #[error("Dependency cycle between loaders: {loaders:?}")]
    DependencyCycle { loaders: Vec<String> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoadError {
    /// Whether this error stops the loader. Only a missing data file does not.
    #[must_use]
    pub const fn is_loader_fatal(&self) -> bool {
        !matches!(self, Self::MissingFile { .. })
    }
}
