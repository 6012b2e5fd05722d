//! Per-identifier disposition.
//!
//! The classifier is queried once for the uid and once for the gid of every
//! visited object. It never mutates state.

use crate::types::{IdMapping, Phase, Snapshot};

/// Verdict for one identifier value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// In the source range; remap by the mapping's delta.
    NeedsRemap,
    /// Already in the target range because an earlier visit reached this
    /// inode through another hard link. Idempotent no-op.
    AlreadyRemapped,
    /// Outside every range the active phase accepts.
    Invalid,
}

impl Disposition {
    /// Stable label used in facts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::NeedsRemap => "needs_remap",
            Disposition::AlreadyRemapped => "already_remapped",
            Disposition::Invalid => "invalid",
        }
    }
}

/// Which field of the snapshot a disposition refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdField {
    Uid,
    Gid,
}

impl IdField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdField::Uid => "uid",
            IdField::Gid => "gid",
        }
    }

    pub fn value(&self, snap: &Snapshot) -> u32 {
        match self {
            IdField::Uid => snap.uid,
            IdField::Gid => snap.gid,
        }
    }
}

impl std::fmt::Display for IdField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one identifier value from a freshly stat'd object.
///
/// An id in the source range always needs a remap. An id in the target range
/// is accepted as already remapped only when the phase is not preflight, the
/// object is not a directory, and the object has more than one hard link: a
/// physical walk visits a hard-linked file once per name, so by the second
/// name the first visit has already moved it. Directories are exempt from the
/// leniency because their extra "." and ".." link entries are not separately
/// visited, so a directory link count above one never indicates another
/// not-yet-visited name. Everything else is invalid.
///
/// Precondition: the link count observed at visit time reflects all of the
/// object's names inside the tree, and no link is added or removed mid-run.
/// This is trusted, not re-validated.
pub fn disposition(mapping: &IdMapping, phase: Phase, snap: &Snapshot, id: u32) -> Disposition {
    if mapping.in_source(id) {
        return Disposition::NeedsRemap;
    }
    if phase != Phase::Preflight && mapping.in_target(id) && !snap.is_dir && snap.nlink > 1 {
        return Disposition::AlreadyRemapped;
    }
    Disposition::Invalid
}
