//! Physical traversal of a filesystem subtree.
//!
//! Single-threaded recursive walk rooted at a given path. Symbolic links are
//! never followed, so the walk cannot leave the root: every visited path is
//! reached through directory entries read from its parent. Hard-linked files
//! are visited once per name; sibling order within a directory is whatever
//! the OS returns.
//!
//! The number of concurrently-open directory handles is bounded: while the
//! budget allows, a directory's handle stays open during the descent into its
//! entries; at the budget boundary the walker buffers the entry names and
//! closes the handle before descending. The budget is derived from
//! RLIMIT_NOFILE minus the three stdio descriptors, with a conservative
//! fallback of one.

use std::fs;
use std::path::Path;

use rustix::process::{getrlimit, Resource};

use crate::constants::{FALLBACK_FD_BUDGET, RESERVED_STDIO_FDS};
use crate::types::{Snapshot, Visit, VisitKind};

/// Visitor verdict after one object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Unwind the whole walk immediately (commit-phase fail-fast).
    Stop,
}

/// Directory-handle budget for one walk.
///
/// `getrlimit` reports RLIM_INFINITY as an absent value; that case takes the
/// conservative fallback budget rather than an unbounded one.
pub fn fd_budget() -> usize {
    match getrlimit(Resource::Nofile).current {
        Some(limit) => {
            let avail = limit.saturating_sub(RESERVED_STDIO_FDS);
            usize::try_from(avail).unwrap_or(usize::MAX).max(1)
        }
        None => FALLBACK_FD_BUDGET,
    }
}

/// Walk the subtree rooted at `root`, handing every entry to `visitor` exactly
/// once per name. Returns `Stop` if the visitor unwound the walk.
pub fn walk<F>(root: &Path, fd_budget: usize, visitor: &mut F) -> WalkControl
where
    F: FnMut(Visit) -> WalkControl,
{
    let budget = fd_budget.max(1);
    let md = match fs::symlink_metadata(root) {
        Ok(md) => md,
        Err(e) => {
            return visitor(Visit {
                path: root.to_path_buf(),
                kind: VisitKind::StatFailed,
                snapshot: None,
                error: Some(e),
            });
        }
    };
    let snap = Snapshot::from_metadata(&md);
    if md.file_type().is_dir() {
        walk_dir(root, snap, budget, visitor)
    } else {
        let kind = if md.file_type().is_symlink() {
            VisitKind::Symlink
        } else {
            VisitKind::File
        };
        visitor(Visit {
            path: root.to_path_buf(),
            kind,
            snapshot: Some(snap),
            error: None,
        })
    }
}

/// Visit a directory and then its entries. `avail` is the number of directory
/// handles this level may still open.
fn walk_dir<F>(dir: &Path, snap: Snapshot, avail: usize, visitor: &mut F) -> WalkControl
where
    F: FnMut(Visit) -> WalkControl,
{
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            // The unreadable directory replaces the ordinary directory visit;
            // its subtree is an error but the walk itself goes on.
            return visitor(Visit {
                path: dir.to_path_buf(),
                kind: VisitKind::UnreadableDir,
                snapshot: Some(snap),
                error: Some(e),
            });
        }
    };

    if visitor(Visit {
        path: dir.to_path_buf(),
        kind: VisitKind::Directory,
        snapshot: Some(snap),
        error: None,
    }) == WalkControl::Stop
    {
        return WalkControl::Stop;
    }

    if avail > 1 {
        // Stream: keep this directory's handle open across the descent.
        for entry in rd {
            match entry {
                Ok(entry) => {
                    if walk_entry(&entry.path(), avail - 1, visitor) == WalkControl::Stop {
                        return WalkControl::Stop;
                    }
                }
                Err(e) => {
                    return visitor(Visit {
                        path: dir.to_path_buf(),
                        kind: VisitKind::UnreadableDir,
                        snapshot: Some(snap),
                        error: Some(e),
                    });
                }
            }
        }
        WalkControl::Continue
    } else {
        // Budget boundary: buffer the names and drop the handle before
        // descending, so the open-handle count never exceeds the budget.
        let mut names = Vec::new();
        let mut read_err = None;
        for entry in rd {
            match entry {
                Ok(entry) => names.push(entry.path()),
                Err(e) => {
                    read_err = Some(e);
                    break;
                }
            }
        }
        if let Some(e) = read_err {
            return visitor(Visit {
                path: dir.to_path_buf(),
                kind: VisitKind::UnreadableDir,
                snapshot: Some(snap),
                error: Some(e),
            });
        }
        for path in names {
            if walk_entry(&path, avail, visitor) == WalkControl::Stop {
                return WalkControl::Stop;
            }
        }
        WalkControl::Continue
    }
}

fn walk_entry<F>(path: &Path, avail: usize, visitor: &mut F) -> WalkControl
where
    F: FnMut(Visit) -> WalkControl,
{
    let md = match fs::symlink_metadata(path) {
        Ok(md) => md,
        Err(e) => {
            return visitor(Visit {
                path: path.to_path_buf(),
                kind: VisitKind::StatFailed,
                snapshot: None,
                error: Some(e),
            });
        }
    };
    let snap = Snapshot::from_metadata(&md);
    let ft = md.file_type();
    if ft.is_dir() {
        walk_dir(path, snap, avail, visitor)
    } else {
        let kind = if ft.is_symlink() {
            VisitKind::Symlink
        } else {
            VisitKind::File
        };
        visitor(Visit {
            path: path.to_path_buf(),
            kind,
            snapshot: Some(snap),
            error: None,
        })
    }
}
