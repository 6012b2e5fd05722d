//! Per-object orchestration: classify, run the metadata hooks, and apply or
//! simulate the ownership change.
//!
//! The fixer owns no traversal state. It receives one visit, produces one
//! outcome, and leaves continue/stop decisions to the pass driver.

mod verify;

use std::path::{Path, PathBuf};

use rustix::fs::{chownat, AtFlags, Gid, Uid, CWD};
use thiserror::Error;

use crate::adapters::{AclAdapter, XattrAdapter};
use crate::classify::{disposition, Disposition, IdField};
use crate::types::{IdMapping, Phase, Visit, VisitKind};

/// Immutable per-pass inputs threaded into every fix.
pub(crate) struct FixContext<'a> {
    pub mapping: &'a IdMapping,
    pub phase: Phase,
    pub verify: bool,
    pub acl: &'a dyn AclAdapter,
    pub xattr: &'a dyn XattrAdapter,
}

/// Which hook stage reported a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookStage {
    Acl,
    Xattr,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::Acl => write!(f, "acl"),
            HookStage::Xattr => write!(f, "xattr"),
        }
    }
}

/// Everything that can go wrong for a single object.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("{path}: directory not readable: {err}")]
    UnreadableDir { path: PathBuf, err: String },
    #[error("{path}: stat failed: {err}")]
    StatFailed { path: PathBuf, err: String },
    #[error("{path}: {field} {value} out of range [{from}, {end})")]
    OutOfRange {
        path: PathBuf,
        field: IdField,
        value: u32,
        from: u32,
        end: u32,
    },
    #[error("{path}: {stage} fixup failed: {err}")]
    Hook {
        path: PathBuf,
        stage: HookStage,
        err: String,
    },
    #[error("chown({path}, {uid}, {gid}) failed: {err}")]
    Chown {
        path: PathBuf,
        uid: u32,
        gid: u32,
        err: String,
    },
    #[error(
        "{path}: uid {uid} in {uid_range} range but gid {gid} in {gid_range} range"
    )]
    RangeDisagreement {
        path: PathBuf,
        uid: u32,
        uid_range: &'static str,
        gid: u32,
        gid_range: &'static str,
    },
    #[error("{path}: verification stat failed: {err}")]
    VerifyStat { path: PathBuf, err: String },
    #[error("{path}: permission bits changed during chown: was {was:06o} now {now:06o}")]
    VerifyMode { path: PathBuf, was: u32, now: u32 },
    #[error("{path}: unexpected {field} after chown: expected {expected} found {found}")]
    VerifyId {
        path: PathBuf,
        field: IdField,
        expected: u32,
        found: u32,
    },
}

/// What the fixer did (or would do) to the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixAction {
    /// Ownership change issued.
    Remapped,
    /// Both ids already in the target range; idempotent no-op.
    Skipped,
    /// Nothing applied: non-mutating phase, or errors preempted the change.
    None,
}

impl FixAction {
    /// Stable label used in facts.
    pub fn as_str(&self) -> &'static str {
        match self {
            FixAction::Remapped => "remapped",
            FixAction::Skipped => "skipped",
            FixAction::None => "none",
        }
    }
}

/// Result of one fixer invocation, consumed by the pass driver.
#[derive(Debug)]
pub struct ObjectOutcome {
    /// Dispositions for uid and gid; absent when a structural error preempted
    /// classification.
    pub dispositions: Option<(Disposition, Disposition)>,
    pub new_uid: Option<u32>,
    pub new_gid: Option<u32>,
    pub action: FixAction,
    pub errors: Vec<FixError>,
}

impl ObjectOutcome {
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    fn structural(err: FixError) -> Self {
        Self {
            dispositions: None,
            new_uid: None,
            new_gid: None,
            action: FixAction::None,
            errors: vec![err],
        }
    }
}

fn range_label(done: bool) -> &'static str {
    if done {
        "target"
    } else {
        "source"
    }
}

/// Process one visited object under the active phase.
pub(crate) fn fix_object(ctx: &FixContext<'_>, visit: &Visit) -> ObjectOutcome {
    let err_text = |e: &Option<std::io::Error>| {
        e.as_ref()
            .map_or_else(|| "unknown error".to_string(), ToString::to_string)
    };
    match visit.kind {
        VisitKind::UnreadableDir => {
            return ObjectOutcome::structural(FixError::UnreadableDir {
                path: visit.path.clone(),
                err: err_text(&visit.error),
            });
        }
        VisitKind::StatFailed => {
            return ObjectOutcome::structural(FixError::StatFailed {
                path: visit.path.clone(),
                err: err_text(&visit.error),
            });
        }
        VisitKind::File | VisitKind::Directory | VisitKind::Symlink => {}
    }
    let Some(snap) = visit.snapshot else {
        return ObjectOutcome::structural(FixError::StatFailed {
            path: visit.path.clone(),
            err: "no snapshot captured".to_string(),
        });
    };

    let mut errors = Vec::new();
    let u = disposition(ctx.mapping, ctx.phase, &snap, snap.uid);
    let g = disposition(ctx.mapping, ctx.phase, &snap, snap.gid);
    for (field, disp) in [(IdField::Uid, u), (IdField::Gid, g)] {
        if disp == Disposition::Invalid {
            errors.push(FixError::OutOfRange {
                path: visit.path.clone(),
                field,
                value: field.value(&snap),
                from: ctx.mapping.from(),
                end: ctx.mapping.source_end(),
            });
        }
    }

    let remap = |disp: Disposition, id: u32| match disp {
        Disposition::NeedsRemap => ctx.mapping.apply(id),
        Disposition::AlreadyRemapped | Disposition::Invalid => id,
    };
    let new_uid = remap(u, snap.uid);
    let new_gid = remap(g, snap.gid);

    if let Err(e) = ctx.acl.fix_acl(&visit.path) {
        errors.push(FixError::Hook {
            path: visit.path.clone(),
            stage: HookStage::Acl,
            err: e.to_string(),
        });
    }
    if let Err(e) = ctx.xattr.fix_xattr(&visit.path) {
        errors.push(FixError::Hook {
            path: visit.path.clone(),
            stage: HookStage::Xattr,
            err: e.to_string(),
        });
    }

    let mut outcome = ObjectOutcome {
        dispositions: Some((u, g)),
        new_uid: Some(new_uid),
        new_gid: Some(new_gid),
        action: FixAction::None,
        errors,
    };

    if !ctx.phase.mutates() || outcome.failed() {
        return outcome;
    }

    let u_done = u == Disposition::AlreadyRemapped;
    let g_done = g == Disposition::AlreadyRemapped;
    if u_done != g_done {
        // The preflight pass saw a consistent tree; a split like this means
        // something else mutated the filesystem while we were running.
        outcome.errors.push(FixError::RangeDisagreement {
            path: visit.path.clone(),
            uid: snap.uid,
            uid_range: range_label(u_done),
            gid: snap.gid,
            gid_range: range_label(g_done),
        });
        return outcome;
    }
    if u_done {
        outcome.action = FixAction::Skipped;
        return outcome;
    }

    if let Err(e) = chown_no_follow(&visit.path, new_uid, new_gid) {
        outcome.errors.push(FixError::Chown {
            path: visit.path.clone(),
            uid: new_uid,
            gid: new_gid,
            err: e.to_string(),
        });
        return outcome;
    }
    outcome.action = FixAction::Remapped;

    if ctx.verify {
        verify::check(&visit.path, &snap, new_uid, new_gid, &mut outcome.errors);
    }
    outcome
}

/// Change ownership of the object itself, never of a symlink's target.
fn chown_no_follow(path: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
    chownat(
        CWD,
        path,
        Some(Uid::from_raw(uid)),
        Some(Gid::from_raw(gid)),
        AtFlags::SYMLINK_NOFOLLOW,
    )
    .map_err(std::io::Error::from)
}
