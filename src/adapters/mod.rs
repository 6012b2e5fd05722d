//! Capability seams for metadata that ownership remapping does not cover.
//!
//! POSIX ACL entries and extended attributes can embed uids of their own. The
//! fixer calls both adapters on every visited object before any ownership
//! mutation; a reported failure marks the object failed. The bundled
//! implementations succeed without doing anything — a deployment that needs
//! real ACL/xattr remapping substitutes its own.

use std::path::Path;

use crate::types::errors::Result;

/// Remap uids embedded in a path's POSIX ACL entries.
pub trait AclAdapter {
    fn fix_acl(&self, path: &Path) -> Result<()>;
}

/// Remap uids embedded in a path's extended attributes.
pub trait XattrAdapter {
    fn fix_xattr(&self, path: &Path) -> Result<()>;
}

/// Default ACL adapter: nothing to fix.
#[derive(Default)]
pub struct NoopAclAdapter;

impl AclAdapter for NoopAclAdapter {
    fn fix_acl(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Default xattr adapter: nothing to fix.
#[derive(Default)]
pub struct NoopXattrAdapter;

impl XattrAdapter for NoopXattrAdapter {
    fn fix_xattr(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
