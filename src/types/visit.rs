//! One walker-to-fixer handoff.
//!
//! The walker classifies every entry it reaches into a `VisitKind` before the
//! fixer sees it. The enum is closed: traversal states that the walker cannot
//! produce are unrepresentable, so the fixer has no defect arm to reach.

use std::path::PathBuf;

use super::snapshot::Snapshot;

/// Kind of a visited filesystem object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitKind {
    /// Regular file, or any other non-directory non-symlink object.
    File,
    /// Directory, visited before its entries.
    Directory,
    /// Symbolic link; never followed.
    Symlink,
    /// Directory whose entries could not be listed. Not descended into.
    UnreadableDir,
    /// Object that could not be stat'd; no snapshot is available.
    StatFailed,
}

impl VisitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitKind::File => "file",
            VisitKind::Directory => "dir",
            VisitKind::Symlink => "symlink",
            VisitKind::UnreadableDir => "unreadable_dir",
            VisitKind::StatFailed => "stat_failed",
        }
    }
}

/// A single visited object: path, kind, snapshot when one could be taken, and
/// the io error behind an `UnreadableDir` or `StatFailed` kind.
#[derive(Debug)]
pub struct Visit {
    pub path: PathBuf,
    pub kind: VisitKind,
    pub snapshot: Option<Snapshot>,
    pub error: Option<std::io::Error>,
}
