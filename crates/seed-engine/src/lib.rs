//! # seed-engine
//!
//! Loads declarative data files into a [`Store`](seed_store::Store).
//!
//! - [`source`] reads one YAML file into records
//! - [`classify`], [`associations`], [`custom_fields`] prepare a record
//! - [`engine`] reconciles records against the store, one loader at a time
//! - [`registry`] runs loaders in dependency order
//! - [`catalog`] defines the standard loaders

pub mod associations;
pub mod catalog;
pub mod classify;
pub mod custom_fields;
pub mod engine;
pub mod error;
pub mod loader;
pub mod registry;
pub mod source;

pub use engine::{LoaderFailure, Reconciler};
pub use error::LoadError;
pub use loader::{Association, EntityTypeLoader, LoaderSpec, PreProcess};
pub use registry::{LOADER_ORDER, OrderViolation, Registry, RunOptions, derive_order};
pub use source::RecordSource;
