use std::fs;

use serde_json::Value;

use idshift::IdShift;

use crate::helpers::{current_ids, mapping_covering_current_ids, owner_of, Collector};

#[test]
fn dry_run_reports_would_be_changes_without_mutating() {
    let (uid, gid) = current_ids();
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("f"), b"x").unwrap();

    let mapping = mapping_covering_current_ids();
    let delta = mapping.delta();
    let facts = Collector::default();
    let api = IdShift::new(facts.clone(), Collector::default(), mapping);
    let report = api.dry_run(td.path());

    assert!(report.ok(), "{:?}", report.errors);
    assert_eq!(report.visited, 2);
    assert_eq!(report.remapped, 0, "dry run must not issue changes");
    assert_eq!(owner_of(&td.path().join("f")), (uid, gid));

    let events = facts.events.lock().unwrap();
    let row = events
        .iter()
        .find(|(e, _, f)| {
            e == "scan"
                && f.get("path")
                    .and_then(Value::as_str)
                    .is_some_and(|p| p.ends_with("/f"))
        })
        .expect("scan row for f");
    let want_uid = u64::from(uid).checked_add_signed(delta).unwrap();
    assert_eq!(row.2.get("new_uid").and_then(Value::as_u64), Some(want_uid));
    assert_eq!(
        row.2.get("phase").and_then(Value::as_str),
        Some("dry_run")
    );
    assert_eq!(
        row.2.get("action").and_then(Value::as_str),
        Some("none")
    );
    assert_eq!(
        row.2.get("uid_disposition").and_then(Value::as_str),
        Some("needs_remap")
    );
}

#[test]
fn dry_run_aggregates_every_problem_in_one_pass() {
    let (uid, gid) = current_ids();
    let td = tempfile::tempdir().unwrap();
    fs::create_dir(td.path().join("d")).unwrap();
    fs::write(td.path().join("d/one"), b"1").unwrap();
    fs::write(td.path().join("d/two"), b"2").unwrap();

    let high = uid.max(gid) + 1000;
    let mapping = idshift::types::IdMapping::new(high, high + 4, 4).unwrap();
    let api = IdShift::new(Collector::default(), Collector::default(), mapping);
    let report = api.dry_run(td.path());

    assert!(!report.ok());
    assert_eq!(report.visited, 4, "errors must not stop a dry run");
    assert_eq!(report.errors.len(), 8);
}
