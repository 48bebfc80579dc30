//! Stored entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use seed_core::{EntityId, EntityRef, FieldValue, Record};

/// A persisted object. Identity is the store-assigned `id`; uniqueness of the
/// loader-level identity fields is guaranteed by `Store::find_or_create`.
///
/// Mutations through [`Entity::set`] and [`Entity::custom_field_data_mut`] are
/// local until the entity is handed back to `Store::persist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: String,
    #[serde(default)]
    pub fields: Record,
    #[serde(default)]
    pub custom_field_data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Assign a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field.into(), value)
    }

    #[must_use]
    pub fn custom_field(&self, key: &str) -> Option<&Value> {
        self.custom_field_data.get(key)
    }

    pub const fn custom_field_data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.custom_field_data
    }

    /// Handle to this entity for use as an association value.
    #[must_use]
    pub fn to_ref(&self) -> EntityRef {
        EntityRef::new(self.entity_type.clone(), self.id)
    }

    /// Whether every `(field, value)` in `identity` equals this entity's field.
    #[must_use]
    pub fn matches(&self, identity: &Record) -> bool {
        identity
            .iter()
            .all(|(field, value)| self.fields.get(field) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site() -> Entity {
        let now = Utc::now();
        let mut fields = Record::new();
        fields.insert("name".into(), FieldValue::from("HQ"));
        fields.insert("slug".into(), FieldValue::from("hq"));
        Entity {
            id: EntityId(1),
            entity_type: "Site".into(),
            fields,
            custom_field_data: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn matches_requires_every_identity_field() {
        let entity = site();
        let mut identity = Record::new();
        identity.insert("name".into(), FieldValue::from("HQ"));
        assert!(entity.matches(&identity));

        identity.insert("slug".into(), FieldValue::from("other"));
        assert!(!entity.matches(&identity));
    }

    #[test]
    fn set_returns_previous_value() {
        let mut entity = site();
        let previous = entity.set("slug", FieldValue::from("hq-2"));
        assert_eq!(previous, Some(FieldValue::from("hq")));
        assert_eq!(entity.get("slug"), Some(&FieldValue::from("hq-2")));
    }

    #[test]
    fn custom_fields_are_mutable_in_place() {
        let mut entity = site();
        entity
            .custom_field_data_mut()
            .insert("owner".into(), json!("noc"));
        assert_eq!(entity.custom_field("owner"), Some(&json!("noc")));
    }
}
