//! Aggregate report types returned by the engine and rendered by `seedbed`.

use serde::{Deserialize, Serialize};

use crate::outcome::{Notice, RecordOutcome};

/// Final state of one loader's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderStatus {
    /// Every record was processed.
    Completed,
    /// The data file does not exist; nothing to load.
    NoData,
    /// A loader-fatal error stopped processing. Earlier records stay committed.
    Failed,
}

/// Per-loader counts and notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderReport {
    pub loader: String,
    pub entity_type: String,
    pub data_file: String,
    pub status: LoaderStatus,
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub skipped: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl LoaderReport {
    #[must_use]
    pub fn new(
        loader: impl Into<String>,
        entity_type: impl Into<String>,
        data_file: impl Into<String>,
    ) -> Self {
        Self {
            loader: loader.into(),
            entity_type: entity_type.into(),
            data_file: data_file.into(),
            status: LoaderStatus::Completed,
            created: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            error: None,
            notices: Vec::new(),
        }
    }

    pub const fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Created => self.created += 1,
            RecordOutcome::Updated => self.updated += 1,
            RecordOutcome::Unchanged => self.unchanged += 1,
            RecordOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Number of records that reached an outcome.
    #[must_use]
    pub const fn processed(&self) -> u32 {
        self.created + self.updated + self.unchanged + self.skipped
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, LoaderStatus::Failed)
    }
}

/// Result of running a sequence of loaders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub loaders: Vec<LoaderReport>,
    /// Set when `fail_fast` stopped the run before every loader ran.
    #[serde(default)]
    pub stopped_early: bool,
    pub duration_ms: u64,
}

impl RunReport {
    #[must_use]
    pub fn created(&self) -> u32 {
        self.loaders.iter().map(|l| l.created).sum()
    }

    #[must_use]
    pub fn updated(&self) -> u32 {
        self.loaders.iter().map(|l| l.updated).sum()
    }

    #[must_use]
    pub fn unchanged(&self) -> u32 {
        self.loaders.iter().map(|l| l.unchanged).sum()
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.loaders.iter().map(|l| l.skipped).sum()
    }

    /// Loaders that ended in [`LoaderStatus::Failed`].
    pub fn failures(&self) -> impl Iterator<Item = &LoaderReport> {
        self.loaders.iter().filter(|l| l.is_failed())
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    #[must_use]
    pub fn loader(&self, name: &str) -> Option<&LoaderReport> {
        self.loaders.iter().find(|l| l.loader == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_outcomes() {
        let mut report = LoaderReport::new("site", "Site", "sites.yml");
        report.record(RecordOutcome::Created);
        report.record(RecordOutcome::Created);
        report.record(RecordOutcome::Skipped);
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed(), 3);
    }

    #[test]
    fn run_totals_sum_loaders() {
        let mut a = LoaderReport::new("site", "Site", "sites.yml");
        a.record(RecordOutcome::Created);
        let mut b = LoaderReport::new("rack", "Rack", "racks.yml");
        b.record(RecordOutcome::Updated);
        b.status = LoaderStatus::Failed;
        let run = RunReport {
            loaders: vec![a, b],
            stopped_early: false,
            duration_ms: 0,
        };
        assert_eq!(run.created(), 1);
        assert_eq!(run.updated(), 1);
        assert!(run.has_failures());
        assert_eq!(run.failures().count(), 1);
        assert!(run.loader("rack").is_some());
    }
}
