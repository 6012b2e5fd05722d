//! Single-pass driver: walks the tree, fixes every visit, aggregates the
//! outcome, and emits facts.
//!
//! Side-effects:
//! - One `scan` fact per object in non-mutating passes; a `remap.attempt` /
//!   `remap.result` pair per object during commit; one `summary` per pass.
//! - One leveled diagnostic per object error via the audit sink.
//!
//! Preflight and dry-run are continue-on-error so a single pass reports every
//! problem in the tree. Commit stops the walk at the first failed outcome.

use std::path::Path;
use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::fixer::{self, FixAction, FixContext};
use crate::logging::audit::{AuditCtx, AuditMode, StageLogger};
use crate::logging::{ts_for_phase, AuditSink, FactsEmitter};
use crate::types::{pass_id, PassReport, Phase, Visit};
use crate::walk::{self, WalkControl};

use super::errors::{id_for, id_str};
use super::IdShift;

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &IdShift<E, A>,
    root: &Path,
    phase: Phase,
) -> PassReport {
    let t0 = Instant::now();
    let dry = !phase.mutates();
    let tctx = AuditCtx::new(
        &api.facts,
        pass_id(root, &api.mapping, phase).to_string(),
        ts_for_phase(phase),
        phase,
        AuditMode {
            dry_run: dry,
            redact: dry,
        },
    );
    let slog = StageLogger::new(&tctx);
    api.audit.log(
        Level::Info,
        &format!("{phase}: walking {}", root.display()),
    );

    let fctx = FixContext {
        mapping: &api.mapping,
        phase,
        verify: api.verify,
        acl: api.acl.as_ref(),
        xattr: api.xattr.as_ref(),
    };

    let mut visited: u64 = 0;
    let mut remapped: u64 = 0;
    let mut skipped: u64 = 0;
    let mut errors: Vec<String> = Vec::new();

    walk::walk(root, walk::fd_budget(), &mut |visit: Visit| {
        visited += 1;
        if phase.mutates() {
            slog.remap_attempt()
                .path(visit.path.display().to_string())
                .field("kind", json!(visit.kind.as_str()))
                .emit_success();
        }

        let outcome = fixer::fix_object(&fctx, &visit);

        let mut row = json!({
            "kind": visit.kind.as_str(),
            "action": outcome.action.as_str(),
        });
        if let Some(obj) = row.as_object_mut() {
            if let Some(snap) = &visit.snapshot {
                obj.insert("uid".into(), json!(snap.uid));
                obj.insert("gid".into(), json!(snap.gid));
            }
            if let (Some(nu), Some(ng)) = (outcome.new_uid, outcome.new_gid) {
                obj.insert("new_uid".into(), json!(nu));
                obj.insert("new_gid".into(), json!(ng));
            }
            if let Some((u, g)) = outcome.dispositions {
                obj.insert("uid_disposition".into(), json!(u.as_str()));
                obj.insert("gid_disposition".into(), json!(g.as_str()));
            }
            if outcome.failed() {
                let ids: Vec<&str> = outcome.errors.iter().map(|e| id_str(id_for(e))).collect();
                obj.insert("error_ids".into(), json!(ids));
            }
        }
        let row_builder = if phase.mutates() {
            slog.remap_result()
        } else {
            slog.scan()
        };
        let row_builder = row_builder.path(visit.path.display().to_string()).merge(row);
        if outcome.failed() {
            row_builder.emit_failure();
        } else {
            row_builder.emit_success();
        }

        for e in &outcome.errors {
            api.audit.log(Level::Error, &e.to_string());
            errors.push(e.to_string());
        }
        match outcome.action {
            FixAction::Remapped => remapped += 1,
            FixAction::Skipped => skipped += 1,
            FixAction::None => {}
        }

        if phase.mutates() && outcome.failed() {
            WalkControl::Stop
        } else {
            WalkControl::Continue
        }
    });

    let duration_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = slog.summary().merge(json!({
        "visited": visited,
        "remapped": remapped,
        "skipped": skipped,
        "error_count": errors.len(),
        "duration_ms": duration_ms,
    }));
    if errors.is_empty() {
        summary.emit_success();
    } else {
        summary.emit_failure();
    }
    api.audit.log(
        Level::Info,
        &format!("{phase}: finished, {} errors", errors.len()),
    );

    PassReport {
        phase,
        visited,
        remapped,
        skipped,
        errors,
        duration_ms,
    }
}
