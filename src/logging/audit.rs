//! Audit helpers that emit structured facts across idshift stages.
//!
//! Side-effects:
//! - Emits JSON facts via `FactsEmitter` for per-object rows (`preflight`,
//!   `remap.attempt`, `remap.result`) and one summary per pass.
//! - Ensures a minimal envelope on every fact: `schema_version`, `ts`,
//!   `run_id`, `path`, `dry_run`, `phase`.
//! - Applies redaction in non-mutating phases so fact streams are
//!   deterministic and comparable across runs.

use serde_json::{json, Value};

use crate::logging::{redact_event, FactsEmitter};
use crate::types::Phase;

pub(crate) const SCHEMA_VERSION: i64 = 1;

#[derive(Clone, Debug)]
pub(crate) struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: String,
    pub ts: String,
    pub phase: Phase,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        run_id: String,
        ts: String,
        phase: Phase,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            run_id,
            ts,
            phase,
            mode,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    /// Per-object row from a non-mutating pass (preflight or dry-run).
    Scan,
    /// Commit is about to change ownership of one object.
    RemapAttempt,
    /// Commit finished (or skipped) one object.
    RemapResult,
    /// Whole-pass summary.
    Summary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::Scan => "scan",
            Stage::RemapAttempt => "remap.attempt",
            Stage::RemapResult => "remap.result",
            Stage::Summary => "summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope and redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn scan(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Scan)
    }

    pub fn remap_attempt(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RemapAttempt)
    }

    pub fn remap_result(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RemapResult)
    }

    pub fn summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Summary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj.iter() {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
            obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
            obj.entry("ts").or_insert(json!(self.ctx.ts));
            obj.entry("run_id").or_insert(json!(self.ctx.run_id));
            obj.entry("path").or_insert(json!(""));
            obj.entry("dry_run").or_insert(json!(self.ctx.mode.dry_run));
            obj.entry("phase").or_insert(json!(self.ctx.phase.as_str()));
        }
        let out = if self.ctx.mode.redact {
            redact_event(fields)
        } else {
            fields
        };
        self.ctx
            .facts
            .emit("idshift", self.stage.as_event(), decision.as_str(), out);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }

    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}
