//! Per-loader reconciliation.
//!
//! For each record: pre-process, set aside extended attributes, drop ignored
//! fields, resolve associations, validate extended attributes, find-or-create
//! by identity, merge extended attributes, then update the remaining fields if
//! the loader's policy allows it. An entity is persisted at most once per
//! record.

use std::path::Path;

use seed_core::{LoaderReport, LoaderStatus, Notice, NoticeKind, Record, RecordOutcome};
use seed_store::{Entity, Store};

use crate::associations;
use crate::classify::{self, CUSTOM_FIELD_DATA, CUSTOM_FIELDS_ALIAS};
use crate::custom_fields;
use crate::error::LoadError;
use crate::loader::{EntityTypeLoader, PreProcess};
use crate::source::RecordSource;

/// A loader that stopped on a fatal error, with whatever it got through first.
#[derive(Debug)]
pub struct LoaderFailure {
    pub report: LoaderReport,
    pub error: LoadError,
}

/// Runs loaders against a store.
pub struct Reconciler<'s> {
    store: &'s mut dyn Store,
}

impl<'s> Reconciler<'s> {
    pub fn new(store: &'s mut dyn Store) -> Self {
        Self { store }
    }

    /// Read the loader's data file from `data_dir` and reconcile every record.
    ///
    /// A missing data file is not an error: the report comes back with
    /// [`LoaderStatus::NoData`].
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderFailure`] on the first loader-fatal error. Records
    /// reconciled before it stay committed and are counted in its report.
    pub fn run_loader(
        &mut self,
        loader: &dyn EntityTypeLoader,
        updates_allowed: bool,
        data_dir: &Path,
    ) -> Result<LoaderReport, LoaderFailure> {
        let mut report = LoaderReport::new(
            loader.name(),
            loader.target_type(),
            loader.data_file_name(),
        );
        let path = data_dir.join(loader.data_file_name());
        let primary = loader.key_field().unwrap_or("name");

        let source = match RecordSource::open(&path, primary) {
            Ok(source) => source,
            Err(error) if !error.is_loader_fatal() => {
                tracing::debug!(loader = loader.name(), path = %path.display(), "no data file, skipping");
                report.status = LoaderStatus::NoData;
                return Ok(report);
            }
            Err(error) => return Err(fail(report, error)),
        };

        match self.load_records(loader, updates_allowed, source, &mut report) {
            Ok(()) => Ok(report),
            Err(error) => Err(fail(report, error)),
        }
    }

    /// Reconcile records from any source, accumulating into `report`.
    ///
    /// # Errors
    ///
    /// Stops at the first loader-fatal error.
    pub fn load_records(
        &mut self,
        loader: &dyn EntityTypeLoader,
        updates_allowed: bool,
        records: impl IntoIterator<Item = Result<Record, LoadError>>,
        report: &mut LoaderReport,
    ) -> Result<(), LoadError> {
        let file = loader.data_file_name().to_string();
        for (index, record) in records.into_iter().enumerate() {
            let outcome = self.reconcile(loader, updates_allowed, record?, &file, index, report)?;
            report.record(outcome);
        }
        tracing::debug!(
            loader = loader.name(),
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            "loader finished"
        );
        Ok(())
    }

    /// Reconcile one record and return its outcome. Notices go to `report`.
    ///
    /// # Errors
    ///
    /// Any loader-fatal error for this record.
    pub fn reconcile(
        &mut self,
        loader: &dyn EntityTypeLoader,
        updates_allowed: bool,
        record: Record,
        file: &str,
        index: usize,
        report: &mut LoaderReport,
    ) -> Result<RecordOutcome, LoadError> {
        let mut record = match loader.pre_process(record) {
            PreProcess::Proceed(record) => record,
            PreProcess::Skip => {
                tracing::debug!(loader = loader.name(), index, "record not needed, skipping");
                return Ok(RecordOutcome::Skipped);
            }
            PreProcess::Abort(reason) => {
                tracing::info!(loader = loader.name(), index, %reason, "record skipped");
                report
                    .notices
                    .push(Notice::new(NoticeKind::Skipped, reason));
                return Ok(RecordOutcome::Skipped);
            }
        };

        let block = classify::take_custom_fields(&mut record, file, index)?;
        if block.deprecated {
            let message = format!("⚠️ Please rename '{CUSTOM_FIELDS_ALIAS}' to '{CUSTOM_FIELD_DATA}'!");
            tracing::warn!(loader = loader.name(), file, index, "{message}");
            report.notices.push(Notice::new(NoticeKind::Warning, message));
        }
        classify::drop_ignored(&mut record, loader.ignored_fields());

        let store: &dyn Store = &*self.store;
        associations::resolve_required(store, loader.name(), &mut record, loader.required_associations())?;
        associations::resolve_optional(store, loader.name(), &mut record, loader.optional_associations())?;

        let custom_values = custom_fields::normalize(block.values);
        custom_fields::validate(store, loader.name(), loader.target_type(), &custom_values)?;

        let (identity, remainder) = classify::split_identity(record, loader.unique_fields());
        if identity.is_empty() {
            return Err(LoadError::NoIdentity {
                loader: loader.name().to_string(),
                unique_fields: loader.unique_fields().iter().map(ToString::to_string).collect(),
            });
        }
        let label = identity_label(&identity);

        // Completing loaders always write their fields; extended attributes
        // still follow the policy.
        let (mut entity, created, write_fields) = if loader.completes_existing() {
            match self.store.find(loader.target_type(), &identity)? {
                Some(entity) => (entity, false, true),
                None => {
                    tracing::debug!(loader = loader.name(), %label, "no existing entity to complete");
                    return Ok(RecordOutcome::Skipped);
                }
            }
        } else {
            let (entity, created) =
                self.store
                    .find_or_create(loader.target_type(), &identity, remainder.clone())?;
            (entity, created, updates_allowed)
        };

        if created {
            notify(report, loader, NoticeKind::Created, &label);
        }

        let mut dirty = custom_fields::merge(&mut entity, custom_values, updates_allowed);
        if !created && write_fields {
            dirty |= apply_updates(&mut entity, remainder);
        }

        if dirty {
            self.store.persist(&entity)?;
            if !created {
                notify(report, loader, NoticeKind::Updated, &label);
            }
        }

        Ok(if created {
            RecordOutcome::Created
        } else if dirty {
            RecordOutcome::Updated
        } else {
            RecordOutcome::Unchanged
        })
    }
}

/// Assign every field whose value differs. Returns whether any did.
fn apply_updates(entity: &mut Entity, remainder: Record) -> bool {
    let mut changed = false;
    for (field, value) in remainder {
        if entity.get(&field) != Some(&value) {
            entity.set(field, value);
            changed = true;
        }
    }
    changed
}

/// Display name for notices: the first plain identity value, so a device is
/// named by its `name` rather than its device type handle.
fn identity_label(identity: &Record) -> String {
    identity
        .values()
        .find(|v| v.as_value().is_some())
        .or_else(|| identity.values().next())
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn notify(report: &mut LoaderReport, loader: &dyn EntityTypeLoader, kind: NoticeKind, label: &str) {
    let verb = match kind {
        NoticeKind::Updated => "Updated",
        _ => "Created",
    };
    let message = format!("{}  {verb} {} {label}", loader.icon(), loader.noun());
    tracing::info!("{message}");
    report.notices.push(Notice::new(kind, message));
}

fn fail(mut report: LoaderReport, error: LoadError) -> LoaderFailure {
    tracing::error!(loader = %report.loader, error = %error, "loader aborted");
    report.status = LoaderStatus::Failed;
    report.error = Some(error.to_string());
    LoaderFailure { report, error }
}
