use serde::Serialize;

use seed_config::SeedConfig;
use seed_engine::Registry;

use crate::cli::GlobalFlags;
use crate::cli::commands::OrderArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct OrderRow<'a> {
    position: usize,
    loader: &'a str,
    entity_type: &'a str,
    data_file: &'a str,
    updatable: bool,
}

/// Handle `seedbed order`.
pub fn handle(args: &OrderArgs, config: &SeedConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = Registry::standard(config.updates.updatable_objects.clone());
    let names = if args.derived {
        registry.derived_order()?
    } else {
        registry.order().to_vec()
    };

    let rows: Vec<OrderRow<'_>> = names
        .iter()
        .filter_map(|name| registry.get(name))
        .enumerate()
        .map(|(index, entry)| OrderRow {
            position: index + 1,
            loader: entry.loader.name(),
            entity_type: entry.loader.target_type(),
            data_file: entry.loader.data_file_name(),
            updatable: entry.updates_allowed,
        })
        .collect();
    output(&rows, flags.format)
}
