//! Extended attribute validation and merge.

use serde_json::{Map, Value};

use seed_store::{CustomFieldStatus, Entity, Store};

use crate::error::LoadError;

/// Strip surrounding quote characters from string values.
#[must_use]
pub fn normalize(values: Map<String, Value>) -> Map<String, Value> {
    values
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => {
                let trimmed = s.trim_matches(|c| c == '"' || c == '\'');
                (key, Value::String(trimmed.to_string()))
            }
            other => (key, other),
        })
        .collect()
}

/// Check every key against the store's descriptors for `entity_type`.
///
/// All keys are checked before failing, so one error names every offender.
///
/// # Errors
///
/// - `LoadError::UnknownAttributes` if any key has no descriptor. Disabled keys
///   found in the same pass ride along in `disabled`.
/// - `LoadError::AttributesNotEnabled` if every key exists but some are not
///   enabled for `entity_type`.
pub fn validate(
    store: &dyn Store,
    loader: &str,
    entity_type: &str,
    values: &Map<String, Value>,
) -> Result<(), LoadError> {
    let mut unknown = Vec::new();
    let mut disabled = Vec::new();
    for key in values.keys() {
        match store.custom_field_status(key, entity_type)? {
            CustomFieldStatus::Enabled => {}
            CustomFieldStatus::Unknown => unknown.push(key.clone()),
            CustomFieldStatus::Disabled => disabled.push(key.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(LoadError::UnknownAttributes {
            loader: loader.to_string(),
            entity_type: entity_type.to_string(),
            keys: unknown,
            disabled,
        });
    }
    if !disabled.is_empty() {
        return Err(LoadError::AttributesNotEnabled {
            loader: loader.to_string(),
            entity_type: entity_type.to_string(),
            keys: disabled,
        });
    }
    Ok(())
}

/// Merge `values` into the entity's extended attributes.
///
/// A key the entity lacks is always written. An existing key is overwritten
/// only when `overwrite` is set and the value differs. Returns whether anything
/// was written; the caller persists.
pub fn merge(entity: &mut Entity, values: Map<String, Value>, overwrite: bool) -> bool {
    let data = entity.custom_field_data_mut();
    let mut changed = false;
    for (key, value) in values {
        match data.get(&key) {
            None => {
                data.insert(key, value);
                changed = true;
            }
            Some(current) if overwrite && *current != value => {
                data.insert(key, value);
                changed = true;
            }
            Some(_) => {}
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use seed_core::{Record, record_from_json};
    use seed_store::MemoryStore;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn device(store: &mut MemoryStore) -> Entity {
        let identity = record_from_json(json!({"name": "web"})).unwrap();
        store.find_or_create("Device", &identity, Record::new()).unwrap().0
    }

    #[test]
    fn quotes_are_stripped() {
        let out = normalize(map(json!({"a": "\"quoted\"", "b": "'single'", "c": 3})));
        assert_eq!(Value::Object(out), json!({"a": "quoted", "b": "single", "c": 3}));
    }

    #[test]
    fn unknown_keys_are_accumulated() {
        let store = MemoryStore::new();
        let err = validate(&store, "devices", "Device", &map(json!({"x": 1, "y": 2}))).unwrap_err();
        match err {
            LoadError::UnknownAttributes { keys, disabled, .. } => {
                assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
                assert!(disabled.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_wins_and_carries_disabled() {
        let mut store = MemoryStore::new();
        store.register_custom_field("owner", &["Site"]).unwrap();
        let err =
            validate(&store, "devices", "Device", &map(json!({"owner": 1, "x": 2}))).unwrap_err();
        match err {
            LoadError::UnknownAttributes { keys, disabled, .. } => {
                assert_eq!(keys, vec!["x".to_string()]);
                assert_eq!(disabled, vec!["owner".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn disabled_keys_are_reported() {
        let mut store = MemoryStore::new();
        store.register_custom_field("owner", &["Site"]).unwrap();
        let err = validate(&store, "devices", "Device", &map(json!({"owner": 1}))).unwrap_err();
        assert!(matches!(err, LoadError::AttributesNotEnabled { ref keys, .. } if keys == &["owner"]));
    }

    #[test]
    fn enabled_keys_pass() {
        let mut store = MemoryStore::new();
        store.register_custom_field("owner", &["dcim.device"]).unwrap();
        validate(&store, "devices", "Device", &map(json!({"owner": "noc"}))).unwrap();
    }

    #[test]
    fn new_keys_always_written() {
        let mut store = MemoryStore::new();
        let mut entity = device(&mut store);
        assert!(merge(&mut entity, map(json!({"owner": "noc"})), false));
        assert_eq!(entity.custom_field("owner"), Some(&json!("noc")));
    }

    #[test]
    fn existing_keys_need_overwrite() {
        let mut store = MemoryStore::new();
        let mut entity = device(&mut store);
        merge(&mut entity, map(json!({"owner": "noc"})), false);

        assert!(!merge(&mut entity, map(json!({"owner": "ops"})), false));
        assert_eq!(entity.custom_field("owner"), Some(&json!("noc")));

        assert!(merge(&mut entity, map(json!({"owner": "ops"})), true));
        assert_eq!(entity.custom_field("owner"), Some(&json!("ops")));
    }

    #[test]
    fn equal_values_are_not_changes() {
        let mut store = MemoryStore::new();
        let mut entity = device(&mut store);
        merge(&mut entity, map(json!({"owner": "noc"})), false);
        assert!(!merge(&mut entity, map(json!({"owner": "noc"})), true));
    }
}
