//! JSON shape of report types, as consumed by `seedbed --format json`.

use pretty_assertions::assert_eq;
use seed_core::{
    EntityId, EntityRef, FieldValue, LoaderReport, LoaderStatus, Notice, NoticeKind,
    RecordOutcome, RunReport,
};
use serde_json::json;

#[test]
fn loader_report_omits_empty_error_and_notices() {
    let report = LoaderReport::new("site", "Site", "sites.yml");
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(
        value,
        json!({
            "loader": "site",
            "entity_type": "Site",
            "data_file": "sites.yml",
            "status": "completed",
            "created": 0,
            "updated": 0,
            "unchanged": 0,
            "skipped": 0,
        })
    );
}

#[test]
fn failed_report_carries_error_and_notices() {
    let mut report = LoaderReport::new("rack", "Rack", "racks.yml");
    report.record(RecordOutcome::Created);
    report.notices.push(Notice::new(NoticeKind::Created, "🔳  Created rack R1"));
    report.status = LoaderStatus::Failed;
    report.error = Some("association not found".into());

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["error"], "association not found");
    assert_eq!(value["notices"][0]["kind"], "created");
    assert_eq!(value["notices"][0]["message"], "🔳  Created rack R1");

    let back: LoaderReport = serde_json::from_value(value).unwrap();
    assert_eq!(back, report);
}

#[test]
fn run_report_defaults_stopped_early() {
    let run: RunReport = serde_json::from_value(json!({"loaders": [], "duration_ms": 3})).unwrap();
    assert!(!run.stopped_early);
    assert_eq!(run.created(), 0);
}

#[test]
fn field_values_are_tagged() {
    let literal = serde_json::to_value(FieldValue::from("HQ")).unwrap();
    assert_eq!(literal, json!({"value": "HQ"}));

    let handle = serde_json::to_value(FieldValue::Ref(EntityRef::new("Site", EntityId(3)))).unwrap();
    assert_eq!(handle, json!({"ref": {"entity_type": "Site", "id": 3}}));
}
