use std::fs;

use serde_json::Value;

use idshift::logging::TS_ZERO;
use idshift::types::IdMapping;
use idshift::IdShift;

use crate::helpers::{mapping_covering_current_ids, owner_of, Collector};

#[test]
fn clean_tree_passes_preflight() {
    let td = tempfile::tempdir().unwrap();
    fs::create_dir(td.path().join("sub")).unwrap();
    fs::write(td.path().join("sub/f"), b"x").unwrap();

    let facts = Collector::default();
    let api = IdShift::new(facts, Collector::default(), mapping_covering_current_ids());
    let report = api.preflight(td.path());
    assert!(report.ok(), "{:?}", report.errors);
    assert_eq!(report.visited, 3);
    assert_eq!(report.remapped, 0);
}

#[test]
fn invalid_id_is_reported_and_nothing_is_mutated() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("f"), b"x").unwrap();
    let before_root = owner_of(td.path());
    let before_f = owner_of(&td.path().join("f"));

    // A source range that contains none of the tree's ids.
    let high = before_root.0.max(before_root.1) + 1000;
    let mapping = IdMapping::new(high, high + 10, 10).unwrap();
    let api = IdShift::new(Collector::default(), Collector::default(), mapping);
    let report = api.preflight(td.path());

    assert!(!report.ok());
    // Both objects were still visited: preflight continues on error.
    assert_eq!(report.visited, 2);
    // Each object reports uid and gid separately, with path and field context.
    assert_eq!(report.errors.len(), 4);
    assert!(report.errors.iter().any(|e| e.contains("uid")));
    assert!(report.errors.iter().any(|e| e.contains("gid")));
    assert!(report
        .errors
        .iter()
        .any(|e| e.contains(&format!("[{high}, {})", high + 10))));

    assert_eq!(owner_of(td.path()), before_root);
    assert_eq!(owner_of(&td.path().join("f")), before_f);
}

#[test]
fn target_range_ids_are_invalid_during_preflight_even_with_hard_links() {
    let (uid, gid) = crate::helpers::current_ids();
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("a"), b"x").unwrap();
    fs::hard_link(td.path().join("a"), td.path().join("b")).unwrap();

    // Current ids sit in the *target* range: preflight must refuse them even
    // though the file has two links.
    let top = uid.max(gid) + 1;
    let mapping = IdMapping::new(top, 0, top).unwrap();
    let api = IdShift::new(Collector::default(), Collector::default(), mapping);
    let report = api.preflight(td.path());
    assert!(!report.ok());
}

#[test]
fn scan_facts_are_deterministic_and_carry_the_envelope() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("f"), b"x").unwrap();

    let facts = Collector::default();
    let api = IdShift::new(facts.clone(), Collector::default(), mapping_covering_current_ids());
    let report = api.preflight(td.path());
    assert!(report.ok());

    let events = facts.events.lock().unwrap();
    let scans: Vec<&(String, String, Value)> =
        events.iter().filter(|(e, _, _)| e == "scan").collect();
    assert_eq!(scans.len(), 2);
    for (_, decision, fields) in &scans {
        assert_eq!(decision, "success");
        assert_eq!(fields.get("phase").and_then(Value::as_str), Some("preflight"));
        assert_eq!(fields.get("dry_run").and_then(Value::as_bool), Some(true));
        assert_eq!(fields.get("ts").and_then(Value::as_str), Some(TS_ZERO));
        assert!(fields.get("run_id").is_some());
        assert!(fields.get("uid").is_some());
    }
    let summary = events
        .iter()
        .find(|(e, _, _)| e == "summary")
        .expect("summary fact");
    assert_eq!(summary.1, "success");
    assert_eq!(summary.2.get("visited").and_then(Value::as_u64), Some(2));
}

#[test]
fn preflight_facts_share_a_run_id_across_reruns() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("f"), b"x").unwrap();
    let facts = Collector::default();
    let api = IdShift::new(facts.clone(), Collector::default(), mapping_covering_current_ids());
    api.preflight(td.path());
    api.preflight(td.path());

    let events = facts.events.lock().unwrap();
    let run_ids: Vec<String> = events
        .iter()
        .filter_map(|(_, _, f)| f.get("run_id").and_then(Value::as_str).map(String::from))
        .collect();
    assert!(!run_ids.is_empty());
    assert!(run_ids.iter().all(|id| id == &run_ids[0]));
}
