//! The per-entity-type loader contract.
//!
//! A loader is configuration, not behavior: which file to read, which fields
//! identify an entity, which fields reference other entities, which fields to
//! drop. [`LoaderSpec`] is the data-driven implementation used by the catalog;
//! anything else can implement [`EntityTypeLoader`] directly.

use std::fmt;

use seed_core::Record;

/// Unique fields used when a loader does not declare its own.
pub const DEFAULT_UNIQUE_FIELDS: &[&str] = &["name", "slug"];

/// A record field holding a human-readable reference to another entity.
///
/// `field: "site"` with `target: "Site"` and `lookup: "name"` means the record's
/// `site` value is the `name` of an existing `Site`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub field: &'static str,
    pub target: &'static str,
    pub lookup: &'static str,
}

impl Association {
    #[must_use]
    pub const fn new(field: &'static str, target: &'static str, lookup: &'static str) -> Self {
        Self {
            field,
            target,
            lookup,
        }
    }

    /// Shorthand for the common lookup by `name`.
    #[must_use]
    pub const fn by_name(field: &'static str, target: &'static str) -> Self {
        Self::new(field, target, "name")
    }
}

/// Result of a loader's pre-processing hook.
#[derive(Debug, Clone, PartialEq)]
pub enum PreProcess {
    /// Continue with the (possibly rewritten) record.
    Proceed(Record),
    /// Nothing to do for this record. Not an error.
    Skip,
    /// The record cannot be imported; log the reason and continue the batch.
    Abort(String),
}

/// Configuration driving the reconciliation engine for one entity type.
pub trait EntityTypeLoader: Send + Sync {
    /// Registry key, also used in the ordering list (`"devices"`).
    fn name(&self) -> &str;

    /// Singular noun for operator notices (`"device"`).
    fn noun(&self) -> &str {
        self.name()
    }

    fn icon(&self) -> &str;

    /// Entity type this loader populates (`"Device"`).
    fn target_type(&self) -> &str;

    /// File name inside the data directory (`"devices.yml"`).
    fn data_file_name(&self) -> &str;

    /// Fields that identify an entity for find-or-create, in priority order.
    fn unique_fields(&self) -> &[&str] {
        DEFAULT_UNIQUE_FIELDS
    }

    /// Field that receives the entry key when the data file is a mapping.
    /// Loaders sharing a file with another loader must agree on it.
    fn key_field(&self) -> Option<&str> {
        self.unique_fields().first().copied()
    }

    /// References that must resolve; a missing or dangling one aborts the loader.
    fn required_associations(&self) -> &[Association] {
        &[]
    }

    /// References resolved only when present in the record.
    fn optional_associations(&self) -> &[Association] {
        &[]
    }

    /// Fields dropped before anything else looks at the record.
    fn ignored_fields(&self) -> &[&str] {
        &[]
    }

    /// Whether this loader only completes entities created by an earlier loader.
    ///
    /// Such loaders never create: a record with no matching entity is skipped,
    /// and the fields of matching entities are written regardless of the update
    /// policy. Extended attributes still follow it.
    fn completes_existing(&self) -> bool {
        false
    }

    fn pre_process(&self, record: Record) -> PreProcess {
        PreProcess::Proceed(record)
    }
}

/// Data-driven [`EntityTypeLoader`].
///
/// ```
/// use seed_engine::loader::{Association, LoaderSpec};
///
/// const RACKS: LoaderSpec = LoaderSpec::new("racks", "rack", "🔳", "Rack", "racks.yml")
///     .unique(&["name", "site"])
///     .required(&[Association::by_name("site", "Site")]);
/// ```
#[derive(Clone, Copy)]
pub struct LoaderSpec {
    pub name: &'static str,
    pub noun: &'static str,
    pub icon: &'static str,
    pub target_type: &'static str,
    pub data_file: &'static str,
    pub unique_fields: &'static [&'static str],
    /// Overrides the mapping key field; defaults to the first unique field.
    pub key_field: Option<&'static str>,
    pub required: &'static [Association],
    pub optional: &'static [Association],
    pub ignored: &'static [&'static str],
    pub completes_existing: bool,
    pub pre_process: Option<fn(Record) -> PreProcess>,
}

impl LoaderSpec {
    #[must_use]
    pub const fn new(
        name: &'static str,
        noun: &'static str,
        icon: &'static str,
        target_type: &'static str,
        data_file: &'static str,
    ) -> Self {
        Self {
            name,
            noun,
            icon,
            target_type,
            data_file,
            unique_fields: DEFAULT_UNIQUE_FIELDS,
            key_field: None,
            required: &[],
            optional: &[],
            ignored: &[],
            completes_existing: false,
            pre_process: None,
        }
    }

    #[must_use]
    pub const fn unique(mut self, fields: &'static [&'static str]) -> Self {
        self.unique_fields = fields;
        self
    }

    #[must_use]
    pub const fn keyed_by(mut self, field: &'static str) -> Self {
        self.key_field = Some(field);
        self
    }

    #[must_use]
    pub const fn required(mut self, associations: &'static [Association]) -> Self {
        self.required = associations;
        self
    }

    #[must_use]
    pub const fn optional(mut self, associations: &'static [Association]) -> Self {
        self.optional = associations;
        self
    }

    #[must_use]
    pub const fn ignored(mut self, fields: &'static [&'static str]) -> Self {
        self.ignored = fields;
        self
    }

    #[must_use]
    pub const fn completing_existing(mut self) -> Self {
        self.completes_existing = true;
        self
    }

    #[must_use]
    pub const fn with_pre_process(mut self, hook: fn(Record) -> PreProcess) -> Self {
        self.pre_process = Some(hook);
        self
    }
}

impl fmt::Debug for LoaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderSpec")
            .field("name", &self.name)
            .field("target_type", &self.target_type)
            .field("data_file", &self.data_file)
            .field("unique_fields", &self.unique_fields)
            .finish_non_exhaustive()
    }
}

impl EntityTypeLoader for LoaderSpec {
    fn name(&self) -> &str {
        self.name
    }

    fn noun(&self) -> &str {
        self.noun
    }

    fn icon(&self) -> &str {
        self.icon
    }

    fn target_type(&self) -> &str {
        self.target_type
    }

    fn data_file_name(&self) -> &str {
        self.data_file
    }

    fn unique_fields(&self) -> &[&str] {
        self.unique_fields
    }

    fn key_field(&self) -> Option<&str> {
        self.key_field.or_else(|| self.unique_fields.first().copied())
    }

    fn required_associations(&self) -> &[Association] {
        self.required
    }

    fn optional_associations(&self) -> &[Association] {
        self.optional
    }

    fn ignored_fields(&self) -> &[&str] {
        self.ignored
    }

    fn completes_existing(&self) -> bool {
        self.completes_existing
    }

    fn pre_process(&self, record: Record) -> PreProcess {
        match self.pre_process {
            Some(hook) => hook(record),
            None => PreProcess::Proceed(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::FieldValue;

    fn skip_everything(_: Record) -> PreProcess {
        PreProcess::Skip
    }

    #[test]
    fn spec_defaults() {
        let spec = LoaderSpec::new("sites", "site", "📍", "Site", "sites.yml");
        assert_eq!(spec.unique_fields(), &["name", "slug"]);
        assert!(spec.required_associations().is_empty());
        assert!(spec.optional_associations().is_empty());
        assert!(spec.ignored_fields().is_empty());
        assert!(!spec.completes_existing());
        assert_eq!(spec.key_field(), Some("name"));
    }

    #[test]
    fn key_field_override() {
        let spec = LoaderSpec::new("primary_ips", "primary IP", "🧬", "Device", "devices.yml")
            .unique(&["name"])
            .keyed_by("device_type");
        assert_eq!(spec.key_field(), Some("device_type"));
    }

    #[test]
    fn default_hook_proceeds_unchanged() {
        let spec = LoaderSpec::new("sites", "site", "📍", "Site", "sites.yml");
        let mut record = Record::new();
        record.insert("name".into(), FieldValue::from("HQ"));
        assert_eq!(spec.pre_process(record.clone()), PreProcess::Proceed(record));
    }

    #[test]
    fn custom_hook_is_called() {
        let spec = LoaderSpec::new("sites", "site", "📍", "Site", "sites.yml")
            .with_pre_process(skip_everything);
        assert_eq!(spec.pre_process(Record::new()), PreProcess::Skip);
    }
}
