use serde::Serialize;

use super::phase::Phase;

/// Aggregate outcome of one traversal pass.
#[derive(Clone, Debug, Serialize)]
pub struct PassReport {
    pub phase: Phase,
    /// Objects handed to the fixer, including structural failures.
    pub visited: u64,
    /// Ownership changes actually issued (commit only).
    pub remapped: u64,
    /// Idempotent no-ops: both ids already in the target range (commit only).
    pub skipped: u64,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl PassReport {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of a full run: preflight, then commit unless preflight failed.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub preflight: PassReport,
    pub commit: Option<PassReport>,
}

impl RunReport {
    pub fn ok(&self) -> bool {
        self.preflight.ok() && self.commit.as_ref().is_some_and(PassReport::ok)
    }
}
