//! In-process store.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};

use seed_core::{EntityId, EntityRef, FieldValue, Record};

use crate::entity::Entity;
use crate::error::StoreError;
use crate::{CUSTOM_FIELD_TARGETS, CUSTOM_FIELD_TYPE, CustomFieldStatus, Store};

/// Entities held in a `BTreeMap` keyed by id, so iteration is creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
    persists: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously saved entities.
    #[must_use]
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let entities: BTreeMap<EntityId, Entity> =
            entities.into_iter().map(|e| (e.id, e)).collect();
        let next_id = entities.keys().next_back().map_or(0, |id| id.0);
        Self {
            entities,
            next_id,
            persists: 0,
        }
    }

    /// All entities of `entity_type`, in creation order.
    pub fn entities<'a>(&'a self, entity_type: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .values()
            .filter(move |e| e.entity_type == entity_type)
    }

    /// Every entity, in creation order.
    pub fn all(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    #[must_use]
    pub fn count(&self, entity_type: &str) -> usize {
        self.entities(entity_type).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of `persist` calls since this store was built.
    #[must_use]
    pub const fn persist_count(&self) -> u64 {
        self.persists
    }

    /// Register a custom field descriptor enabled for the given entity types.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Ambiguous` if duplicate descriptors already exist.
    pub fn register_custom_field(
        &mut self,
        name: &str,
        on_objects: &[&str],
    ) -> Result<Entity, StoreError> {
        let mut identity = Record::new();
        identity.insert("name".into(), FieldValue::from(name));
        let mut defaults = Record::new();
        defaults.insert(
            CUSTOM_FIELD_TARGETS.into(),
            FieldValue::Value(Value::Array(
                on_objects.iter().map(|t| Value::String((*t).to_string())).collect(),
            )),
        );
        let (entity, _) = self.find_or_create(CUSTOM_FIELD_TYPE, &identity, defaults)?;
        Ok(entity)
    }

    fn matching<'a>(
        &'a self,
        entity_type: &'a str,
        predicate: impl Fn(&Entity) -> bool + 'a,
    ) -> Vec<&'a Entity> {
        self.entities(entity_type).filter(|e| predicate(e)).collect()
    }
}

impl Store for MemoryStore {
    fn find_or_create(
        &mut self,
        entity_type: &str,
        identity: &Record,
        defaults: Record,
    ) -> Result<(Entity, bool), StoreError> {
        if let Some(entity) = self.find(entity_type, identity)? {
            return Ok((entity, false));
        }

        self.next_id += 1;
        let id = EntityId(self.next_id);
        let mut fields = identity.clone();
        for (field, value) in defaults {
            fields.entry(field).or_insert(value);
        }
        let now = Utc::now();
        let entity = Entity {
            id,
            entity_type: entity_type.to_string(),
            fields,
            custom_field_data: Map::new(),
            created_at: now,
            updated_at: now,
        };
        tracing::trace!(%id, entity_type, "store: created entity");
        self.entities.insert(id, entity.clone());
        Ok((entity, true))
    }

    fn find(&self, entity_type: &str, identity: &Record) -> Result<Option<Entity>, StoreError> {
        let found = self.matching(entity_type, |e| e.matches(identity));
        match found.as_slice() {
            [] => Ok(None),
            [entity] => Ok(Some((*entity).clone())),
            many => Err(StoreError::Ambiguous {
                entity_type: entity_type.to_string(),
                field: identity.keys().cloned().collect::<Vec<_>>().join("+"),
                value: identity
                    .values()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("+"),
                count: many.len(),
            }),
        }
    }

    fn lookup(
        &self,
        entity_type: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<EntityRef>, StoreError> {
        let found = self.matching(entity_type, |e| {
            e.get(field).and_then(FieldValue::as_value) == Some(value)
        });
        match found.as_slice() {
            [] => Ok(None),
            [entity] => Ok(Some(entity.to_ref())),
            many => Err(StoreError::Ambiguous {
                entity_type: entity_type.to_string(),
                field: field.to_string(),
                value: value.to_string(),
                count: many.len(),
            }),
        }
    }

    fn get(&self, id: EntityId) -> Result<Option<Entity>, StoreError> {
        Ok(self.entities.get(&id).cloned())
    }

    fn persist(&mut self, entity: &Entity) -> Result<(), StoreError> {
        let stored = self
            .entities
            .get_mut(&entity.id)
            .ok_or(StoreError::NotFound { id: entity.id })?;
        if stored.entity_type != entity.entity_type {
            return Err(StoreError::TypeMismatch {
                id: entity.id,
                stored: stored.entity_type.clone(),
                given: entity.entity_type.clone(),
            });
        }
        let mut updated = entity.clone();
        updated.created_at = stored.created_at;
        updated.updated_at = Utc::now();
        *stored = updated;
        self.persists += 1;
        tracing::trace!(id = %entity.id, entity_type = %entity.entity_type, "store: persisted entity");
        Ok(())
    }

    fn custom_field_status(
        &self,
        key: &str,
        entity_type: &str,
    ) -> Result<CustomFieldStatus, StoreError> {
        let key = Value::String(key.to_string());
        let Some(descriptor) = self
            .entities(CUSTOM_FIELD_TYPE)
            .find(|e| e.get("name").and_then(FieldValue::as_value) == Some(&key))
        else {
            return Ok(CustomFieldStatus::Unknown);
        };

        let enabled = match descriptor.get(CUSTOM_FIELD_TARGETS).and_then(FieldValue::as_value) {
            Some(Value::Array(targets)) => targets
                .iter()
                .filter_map(Value::as_str)
                .any(|t| target_matches(t, entity_type)),
            Some(Value::String(target)) => target_matches(target, entity_type),
            _ => false,
        };

        Ok(if enabled {
            CustomFieldStatus::Enabled
        } else {
            CustomFieldStatus::Disabled
        })
    }
}

/// `Device`, `device`, and dotted paths such as `dcim.device` all name `Device`.
fn target_matches(target: &str, entity_type: &str) -> bool {
    let last = target.rsplit('.').next().unwrap_or(target);
    last.trim().eq_ignore_ascii_case(entity_type)
}
