//! Deterministic UUIDv5 identifiers for traversal passes.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that the
//! pass id is reproducible for the same root, mapping, and phase. A rerun
//! over the same tree therefore emits facts that correlate with the previous
//! run's.
use std::path::Path;

use uuid::Uuid;

use crate::constants::NS_TAG;

use super::phase::Phase;
use super::range::IdMapping;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Compute a deterministic UUIDv5 for one traversal pass.
#[must_use]
pub fn pass_id(root: &Path, mapping: &IdMapping, phase: Phase) -> Uuid {
    let s = format!(
        "{}|{}..{}->{}|{}",
        root.display(),
        mapping.from(),
        mapping.count(),
        mapping.to(),
        phase
    );
    Uuid::new_v5(&namespace(), s.as_bytes())
}
