use anyhow::Context;
use serde_json::{Map, Value};

use seed_config::SeedConfig;
use seed_engine::Registry;
use seed_store::{Entity, MemoryStore};

use crate::cli::commands::ShowArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `seedbed show TYPE`.
pub fn handle(args: &ShowArgs, config: &SeedConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entity_type = resolve_type(&args.entity_type, config);
    let store_path = &config.general.store_path;
    let store = MemoryStore::open(store_path)
        .with_context(|| format!("failed to open store at {}", store_path.display()))?;
    let entities: Vec<&Entity> = store.entities(&entity_type).collect();

    if flags.format == OutputFormat::Table {
        let rows: Vec<Map<String, Value>> = entities.into_iter().map(flatten).collect();
        output(&rows, flags.format)
    } else {
        output(&entities, flags.format)
    }
}

/// Accept a loader name (`sites`) or an entity type in any case (`site`).
fn resolve_type(name: &str, config: &SeedConfig) -> String {
    let registry = Registry::standard(config.updates.updatable_objects.clone());
    if let Some(entry) = registry.get(name) {
        return entry.loader.target_type().to_string();
    }
    registry
        .ordered()
        .map(|entry| entry.loader.target_type())
        .find(|t| t.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_string(), ToString::to_string)
}

/// One table row: id, then fields as text, then extended attributes.
fn flatten(entity: &Entity) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("id".into(), Value::from(entity.id.0));
    for (field, value) in &entity.fields {
        row.insert(field.clone(), Value::String(value.to_string()));
    }
    for (key, value) in &entity.custom_field_data {
        row.insert(format!("cf.{key}"), value.clone());
    }
    row
}
