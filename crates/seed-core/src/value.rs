//! Field values, records, and entity handles.
//!
//! A [`Record`] is an ordered map of field name to [`FieldValue`]. Records come
//! out of data files holding plain JSON values; association resolution swaps
//! some of those values for [`EntityRef`] handles before the record reaches
//! the store.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// An ordered, flat field map. Insertion order is the data file's order.
pub type Record = IndexMap<String, FieldValue>;

/// Store-assigned identifier, unique across all entity types in one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved handle to an entity of a given type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub id: EntityId,
}

impl EntityRef {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, id: EntityId) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity_type, self.id)
    }
}

/// The value of a single record or entity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// A literal value as written in the data file.
    Value(Value),
    /// A reference to another entity, produced by association resolution.
    Ref(EntityRef),
}

impl FieldValue {
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Ref(_) => None,
        }
    }

    #[must_use]
    pub const fn as_entity_ref(&self) -> Option<&EntityRef> {
        match self {
            Self::Ref(r) => Some(r),
            Self::Value(_) => None,
        }
    }

    /// `null` and the empty string carry no identity.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Value(Value::Null) => true,
            Self::Value(Value::String(s)) => s.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(Value::String(s)) => f.write_str(s),
            Self::Value(v) => write!(f, "{v}"),
            Self::Ref(r) => write!(f, "{r}"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<EntityRef> for FieldValue {
    fn from(value: EntityRef) -> Self {
        Self::Ref(value)
    }
}

/// Name of a JSON value's type, for diagnostics.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Convert a JSON object into a [`Record`], keeping key order.
///
/// `null` is accepted as an empty record.
///
/// # Errors
///
/// Returns `CoreError::NotAMapping` for any other non-object value, and
/// `CoreError::Validation` if a field name is empty.
pub fn record_from_json(value: Value) -> Result<Record, CoreError> {
    match value {
        Value::Null => Ok(Record::new()),
        Value::Object(map) => {
            let mut record = Record::with_capacity(map.len());
            for (key, value) in map {
                if key.is_empty() {
                    return Err(CoreError::Validation("empty field name".into()));
                }
                record.insert(key, FieldValue::Value(value));
            }
            Ok(record)
        }
        other => Err(CoreError::NotAMapping {
            found: json_type_name(&other),
        }),
    }
}
