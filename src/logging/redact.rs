use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::Phase;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission based on the active phase.
/// Non-mutating phases use the constant zero timestamp for determinism.
pub fn ts_for_phase(phase: Phase) -> String {
    if phase.mutates() {
        now_iso()
    } else {
        TS_ZERO.to_string()
    }
}

/// Apply redactions to a fact event for comparison and safe logging:
/// zero the timestamp and drop volatile timing fields.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
    }
    v
}
