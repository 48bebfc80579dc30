use anyhow::{Context, bail};
use serde::Serialize;

use seed_config::{SeedConfig, UpdatePolicy};
use seed_core::{LoaderReport, LoaderStatus, RunReport};
use seed_engine::{Registry, RunOptions};
use seed_store::MemoryStore;

use crate::cli::commands::LoadArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

/// One table row per loader that had something to say.
#[derive(Debug, Serialize)]
struct LoaderRow<'a> {
    loader: &'a str,
    status: LoaderStatus,
    created: u32,
    updated: u32,
    unchanged: u32,
    skipped: u32,
    error: Option<&'a str>,
}

impl<'a> From<&'a LoaderReport> for LoaderRow<'a> {
    fn from(report: &'a LoaderReport) -> Self {
        Self {
            loader: &report.loader,
            status: report.status,
            created: report.created,
            updated: report.updated,
            unchanged: report.unchanged,
            skipped: report.skipped,
            error: report.error.as_deref(),
        }
    }
}

/// Handle `seedbed load`.
pub fn handle(args: &LoadArgs, config: &SeedConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let policy = args.updatable.as_deref().map_or_else(
        || config.updates.updatable_objects.clone(),
        UpdatePolicy::parse,
    );
    let options = RunOptions {
        only: (!args.only.is_empty()).then(|| args.only.clone()),
        fail_fast: args.fail_fast || config.general.fail_fast,
    };

    let store_path = &config.general.store_path;
    let mut store = MemoryStore::open(store_path)
        .with_context(|| format!("failed to open store at {}", store_path.display()))?;

    let progress = Progress::spinner("loading data files");
    let report = match Registry::standard(policy).run(&mut store, &config.general.data_dir, &options) {
        Ok(report) => report,
        Err(error) => {
            progress.finish_err("load aborted");
            return Err(error.into());
        }
    };
    progress.finish_ok(&format!(
        "{} created, {} updated",
        report.created(),
        report.updated()
    ));

    store
        .save(store_path)
        .with_context(|| format!("failed to save store to {}", store_path.display()))?;

    print_report(&report, flags)?;

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} loader(s) failed");
    }
    Ok(())
}

fn print_report(report: &RunReport, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format != OutputFormat::Table {
        return output(report, flags.format);
    }
    if flags.quiet {
        return Ok(());
    }

    let rows: Vec<LoaderRow<'_>> = report
        .loaders
        .iter()
        .filter(|l| l.status != LoaderStatus::NoData)
        .map(LoaderRow::from)
        .collect();
    output(&rows, flags.format)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn setup(sites: &str) -> (TempDir, SeedConfig, GlobalFlags) {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("initializers");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("sites.yml"), sites).unwrap();

        let mut config = SeedConfig::default();
        config.general.data_dir = data_dir;
        config.general.store_path = dir.path().join(".seedbed").join("store.jsonl");
        let flags = GlobalFlags {
            format: OutputFormat::Raw,
            quiet: true,
            verbose: false,
            data_dir: None,
            store: None,
        };
        (dir, config, flags)
    }

    fn args() -> LoadArgs {
        LoadArgs {
            only: Vec::new(),
            updatable: None,
            fail_fast: false,
        }
    }

    #[test]
    fn load_saves_the_store() {
        let (_dir, config, flags) = setup("- name: HQ\n");
        handle(&args(), &config, &flags).unwrap();
        handle(&args(), &config, &flags).unwrap();

        let store = MemoryStore::open(&config.general.store_path).unwrap();
        assert_eq!(store.count("Site"), 1);
    }

    #[test]
    fn updatable_flag_overrides_config() {
        let (_dir, config, flags) = setup("- name: HQ\n  status: active\n");
        handle(&args(), &config, &flags).unwrap();

        fs::write(
            config.general.data_dir.join("sites.yml"),
            "- name: HQ\n  status: retired\n",
        )
        .unwrap();
        let load = LoadArgs {
            updatable: Some("site".into()),
            ..args()
        };
        handle(&load, &config, &flags).unwrap();

        let store = MemoryStore::open(&config.general.store_path).unwrap();
        let site = store.entities("Site").next().unwrap();
        assert_eq!(site.get("status"), Some(&seed_core::FieldValue::from("retired")));
    }

    #[test]
    fn failed_loader_fails_the_command_but_keeps_progress() {
        let (_dir, config, flags) = setup("- name: HQ\n- 42\n");
        let err = handle(&args(), &config, &flags).unwrap_err();
        assert!(err.to_string().contains("1 loader(s) failed"));

        let store = MemoryStore::open(&config.general.store_path).unwrap();
        assert_eq!(store.count("Site"), 1);
    }
}
