use anyhow::Context;

use seed_config::SeedConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env`), then apply command-line path
/// overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SeedConfig> {
    let mut config = SeedConfig::load_with_dotenv().context("failed to load seedbed configuration")?;
    if let Some(data_dir) = &flags.data_dir {
        config.general.data_dir.clone_from(data_dir);
    }
    if let Some(store) = &flags.store {
        config.general.store_path.clone_from(store);
    }
    tracing::debug!(
        data_dir = %config.general.data_dir.display(),
        store = %config.general.store_path.display(),
        updatable = %config.updates.updatable_objects,
        "configuration loaded"
    );
    Ok(config)
}
