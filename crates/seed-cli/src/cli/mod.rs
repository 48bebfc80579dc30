use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod global;

pub use commands::Commands;
pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `seedbed` binary.
#[derive(Debug, Parser)]
#[command(name = "seedbed", version, about = "Seedbed - seed a data store from YAML files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the data files (overrides `general.data_dir`)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Store snapshot path (overrides `general.store_path`)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
            store: self.store.clone(),
        }
    }
}
