//! # seed-core
//!
//! Core types shared across all Seedbed crates:
//! - [`FieldValue`] and [`Record`], the flat ordered field map every loader works on
//! - [`EntityId`] and [`EntityRef`], handles to entities held by a store
//! - [`RecordOutcome`] and [`Notice`], the per-record observability surface
//! - [`LoaderReport`] and [`RunReport`], aggregate results returned to the CLI
//! - [`CoreError`], value-model errors

pub mod errors;
pub mod outcome;
pub mod responses;
pub mod value;

pub use errors::CoreError;
pub use outcome::{Notice, NoticeKind, RecordOutcome};
pub use responses::{LoaderReport, LoaderStatus, RunReport};
pub use value::{EntityId, EntityRef, FieldValue, Record, json_type_name, record_from_json};
