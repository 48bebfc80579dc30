use anyhow::bail;
use serde::Serialize;

use seed_config::SeedConfig;
use seed_engine::{OrderViolation, Registry};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

#[derive(Debug, Serialize)]
struct FileRow<'a> {
    loader: &'a str,
    data_file: &'a str,
    present: bool,
}

#[derive(Debug, Serialize)]
struct ViolationRow {
    loader: String,
    field: String,
    target: String,
    created_by: String,
    association: &'static str,
}

impl From<OrderViolation> for ViolationRow {
    fn from(v: OrderViolation) -> Self {
        Self {
            loader: v.loader,
            field: v.field,
            target: v.target,
            created_by: v.producer,
            association: if v.required { "required" } else { "optional" },
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    data_dir: String,
    files: Vec<FileRow<'a>>,
    order_violations: Vec<ViolationRow>,
}

/// Handle `seedbed check`.
///
/// Violations of optional associations are reported but do not fail the
/// command; a late required association does.
pub fn handle(config: &SeedConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = Registry::standard(config.updates.updatable_objects.clone());
    let data_dir = &config.general.data_dir;

    let files = registry
        .ordered()
        .map(|entry| FileRow {
            loader: entry.loader.name(),
            data_file: entry.loader.data_file_name(),
            present: data_dir.join(entry.loader.data_file_name()).is_file(),
        })
        .collect();
    let violations = registry.validate_order();
    let required = violations.iter().filter(|v| v.required).count();
    for violation in &violations {
        tracing::warn!("{violation}");
    }

    let report = CheckReport {
        data_dir: data_dir.display().to_string(),
        files,
        order_violations: violations.into_iter().map(ViolationRow::from).collect(),
    };

    if flags.format == OutputFormat::Table {
        output(&report.files, flags.format)?;
        if !report.order_violations.is_empty() {
            println!();
            output(&report.order_violations, flags.format)?;
        }
    } else {
        output(&report, flags.format)?;
    }

    if required > 0 {
        bail!("{required} required association(s) reference entity types created later");
    }
    Ok(())
}
