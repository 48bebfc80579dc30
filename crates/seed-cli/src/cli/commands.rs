use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load data files into the store.
    Load(LoadArgs),
    /// Print the order loaders run in.
    Order(OrderArgs),
    /// Check the loader order and list which data files exist.
    Check,
    /// Print stored entities of one type.
    Show(ShowArgs),
}

#[derive(Clone, Debug, Args)]
pub struct LoadArgs {
    /// Run only these loaders (still in registry order).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Override which entity types may be updated: none, all, or a comma list.
    #[arg(long)]
    pub updatable: Option<String>,

    /// Stop at the first failed loader.
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Clone, Debug, Args)]
pub struct OrderArgs {
    /// Print the order derived from declared associations instead.
    #[arg(long)]
    pub derived: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Entity type (`Site`) or loader name (`sites`).
    pub entity_type: String,
}
