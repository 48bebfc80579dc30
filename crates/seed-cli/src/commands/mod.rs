use seed_config::SeedConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod check;
pub mod load;
pub mod order;
pub mod show;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: &Commands, config: &SeedConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Load(args) => load::handle(args, config, flags),
        Commands::Order(args) => order::handle(args, config, flags),
        Commands::Check => check::handle(config, flags),
        Commands::Show(args) => show::handle(args, config, flags),
    }
}
