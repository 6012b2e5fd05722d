//! Post-mutation verification.
//!
//! Re-stats the object (without following links) and requires the permission
//! bits to be byte-identical to the pre-change snapshot — a security module
//! may strip setuid/setgid during ownership changes — and the uid/gid to
//! match the intended values exactly.

use std::fs;
use std::path::Path;

use crate::classify::IdField;
use crate::types::Snapshot;

use super::FixError;

pub(crate) fn check(
    path: &Path,
    before: &Snapshot,
    want_uid: u32,
    want_gid: u32,
    errors: &mut Vec<FixError>,
) {
    let md = match fs::symlink_metadata(path) {
        Ok(md) => md,
        Err(e) => {
            errors.push(FixError::VerifyStat {
                path: path.to_path_buf(),
                err: e.to_string(),
            });
            return;
        }
    };
    let after = Snapshot::from_metadata(&md);
    if after.mode != before.mode {
        errors.push(FixError::VerifyMode {
            path: path.to_path_buf(),
            was: before.mode,
            now: after.mode,
        });
    }
    if after.uid != want_uid {
        errors.push(FixError::VerifyId {
            path: path.to_path_buf(),
            field: IdField::Uid,
            expected: want_uid,
            found: after.uid,
        });
    }
    if after.gid != want_gid {
        errors.push(FixError::VerifyId {
            path: path.to_path_buf(),
            field: IdField::Gid,
            expected: want_gid,
            found: after.gid,
        });
    }
}
