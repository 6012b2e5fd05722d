// Facade for the API module; pass execution lives in src/api/pass.rs.

use std::path::Path;

use crate::adapters::{AclAdapter, NoopAclAdapter, NoopXattrAdapter, XattrAdapter};
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{IdMapping, PassReport, Phase, RunReport};

pub mod errors;
mod pass;

/// Phase controller: drives preflight, commit, and dry-run passes over one
/// subtree with a validated id mapping.
///
/// There is no standalone commit entry point. The mutating pass only runs
/// through [`IdShift::run`], after a preflight pass finished with zero
/// errors, so the "commit only after clean preflight" rule is structural.
pub struct IdShift<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    mapping: IdMapping,
    acl: Box<dyn AclAdapter>,
    xattr: Box<dyn XattrAdapter>,
    verify: bool,
}

impl<E: FactsEmitter, A: AuditSink> IdShift<E, A> {
    pub fn new(facts: E, audit: A, mapping: IdMapping) -> Self {
        Self {
            facts,
            audit,
            mapping,
            acl: Box::new(NoopAclAdapter),
            xattr: Box::new(NoopXattrAdapter),
            verify: false,
        }
    }

    /// Re-stat every object after its ownership change and require unchanged
    /// permission bits and the exact intended ids.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_acl_adapter(mut self, acl: Box<dyn AclAdapter>) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_xattr_adapter(mut self, xattr: Box<dyn XattrAdapter>) -> Self {
        self.xattr = xattr;
        self
    }

    pub fn mapping(&self) -> &IdMapping {
        &self.mapping
    }

    /// One validation-only pass. Visits the whole tree, mutates nothing, and
    /// aggregates every problem into the report.
    pub fn preflight(&self, root: &Path) -> PassReport {
        pass::run(self, root, Phase::Preflight)
    }

    /// One non-mutating pass that reports what a commit would do, with the
    /// hard-link leniency of a post-preflight pass.
    pub fn dry_run(&self, root: &Path) -> PassReport {
        pass::run(self, root, Phase::DryRun)
    }

    /// Preflight, then commit. A preflight error stops the run before any
    /// mutation; a commit error stops the walk at the failing object, leaving
    /// the subtree partially remapped for a later rerun to report.
    pub fn run(&self, root: &Path) -> RunReport {
        let preflight = self.preflight(root);
        if !preflight.ok() {
            return RunReport {
                preflight,
                commit: None,
            };
        }
        let commit = pass::run(self, root, Phase::Commit);
        RunReport {
            preflight,
            commit: Some(commit),
        }
    }
}
