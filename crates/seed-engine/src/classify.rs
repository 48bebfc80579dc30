//! Splitting a raw record into the parts the engine handles separately.

use serde_json::{Map, Value};

use seed_core::{FieldValue, Record};

use crate::error::LoadError;

/// Field holding extended attributes.
pub const CUSTOM_FIELD_DATA: &str = "custom_field_data";

/// Deprecated alias of [`CUSTOM_FIELD_DATA`].
pub const CUSTOM_FIELDS_ALIAS: &str = "custom_fields";

/// Extended attributes set aside from a record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CustomFieldBlock {
    pub values: Map<String, Value>,
    /// The record used the deprecated alias.
    pub deprecated: bool,
}

/// Remove the extended attribute block from `record`.
///
/// # Errors
///
/// `LoadError::InvalidRecord` if the block is present but not a mapping.
pub fn take_custom_fields(
    record: &mut Record,
    file: &str,
    index: usize,
) -> Result<CustomFieldBlock, LoadError> {
    let primary = record.shift_remove(CUSTOM_FIELD_DATA);
    let alias = record.shift_remove(CUSTOM_FIELDS_ALIAS);
    let deprecated = alias.is_some();

    let values = match primary.or(alias) {
        None | Some(FieldValue::Value(Value::Null)) => Map::new(),
        Some(FieldValue::Value(Value::Object(map))) => map,
        Some(other) => {
            return Err(LoadError::InvalidRecord {
                file: file.to_string(),
                index,
                reason: format!("{CUSTOM_FIELD_DATA} must be a mapping, found {other}"),
            });
        }
    };
    Ok(CustomFieldBlock { values, deprecated })
}

/// Drop every field in `ignored`.
pub fn drop_ignored(record: &mut Record, ignored: &[&str]) {
    for field in ignored {
        record.shift_remove(*field);
    }
}

/// Split `record` into `(identity, remainder)`.
///
/// Identity holds the unique fields present in the record, in `unique_fields`
/// order. Blank unique fields (null or empty string) are dropped from both.
#[must_use]
pub fn split_identity(mut record: Record, unique_fields: &[&str]) -> (Record, Record) {
    let mut identity = Record::new();
    for field in unique_fields {
        match record.shift_remove(*field) {
            Some(value) if !value.is_blank() => {
                identity.insert((*field).to_string(), value);
            }
            _ => {}
        }
    }
    (identity, record)
}
