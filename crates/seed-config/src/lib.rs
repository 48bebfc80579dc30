//! # seed-config
//!
//! Layered configuration loading for Seedbed using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SEEDBED_*` prefix, `__` as separator)
//! 2. Project-level `.seedbed/config.toml`
//! 3. User-level `~/.config/seedbed/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `SEEDBED_UPDATES__UPDATABLE_OBJECTS=all` -> `updates.updatable_objects`,
//! `SEEDBED_GENERAL__DATA_DIR=seed-data` -> `general.data_dir`.
//!
//! # Usage
//!
//! ```no_run
//! use seed_config::SeedConfig;
//!
//! let config = SeedConfig::load_with_dotenv().expect("config");
//! if config.updates.updatable_objects.allows("Device") {
//!     println!("devices may be updated");
//! }
//! ```

mod error;
mod general;
mod updates;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use updates::{UpdatePolicy, UpdatesConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub updates: UpdatesConfig,
}

impl SeedConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain with the project-local config looked up
    /// under `project_root`.
    #[must_use]
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".seedbed").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SEEDBED_").split("__"))
    }

    /// Reject values that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty data directory or store path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.data_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.general.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.store_path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("seedbed").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SeedConfig::default();
        assert!(config.updates.updatable_objects.is_none());
        assert!(!config.general.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_data_dir_is_invalid() {
        let mut config = SeedConfig::default();
        config.general.data_dir = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "general.data_dir"));
    }
}
