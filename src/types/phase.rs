use serde::Serialize;

/// Which traversal pass is active. Exactly one phase governs a pass.
///
/// `Commit` is only reachable through the phase controller after a clean
/// `Preflight`; `DryRun` replaces both with a single non-mutating pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preflight,
    Commit,
    DryRun,
}

impl Phase {
    /// Whether this phase may change ownership on disk.
    pub fn mutates(&self) -> bool {
        matches!(self, Phase::Commit)
    }

    /// Stable lowercase label used in facts and verbose output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Preflight => "preflight",
            Phase::Commit => "commit",
            Phase::DryRun => "dry_run",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
