//! General run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("initializers")
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".seedbed/store.jsonl")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding one data file per entity type (`sites.yml`, ...).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// JSONL snapshot the store is restored from and saved to.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Stop the whole run at the first loader that fails.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_path: default_store_path(),
            fail_fast: false,
        }
    }
}
