use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use idshift::logging::{AuditSink, FactsEmitter};

/// Collects every emitted fact for assertions.
#[derive(Default, Clone)]
pub struct Collector {
    pub events: Arc<Mutex<Vec<(String, String, Value)>>>,
}

impl FactsEmitter for Collector {
    fn emit(&self, _subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), decision.to_string(), fields));
    }
}

impl AuditSink for Collector {
    fn log(&self, _level: log::Level, _msg: &str) {}
}

pub fn is_root() -> bool {
    rustix::process::geteuid().is_root()
}

/// Set ownership without following symlinks. Test setup only.
pub fn set_owner(path: &Path, uid: u32, gid: u32) {
    rustix::fs::chownat(
        rustix::fs::CWD,
        path,
        Some(rustix::fs::Uid::from_raw(uid)),
        Some(rustix::fs::Gid::from_raw(gid)),
        rustix::fs::AtFlags::SYMLINK_NOFOLLOW,
    )
    .unwrap();
}

pub fn owner_of(path: &Path) -> (u32, u32) {
    use std::os::unix::fs::MetadataExt;
    let md = std::fs::symlink_metadata(path).unwrap();
    (md.uid(), md.gid())
}

pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::MetadataExt;
    std::fs::symlink_metadata(path).unwrap().mode()
}

/// The owner/group newly created files get in this environment.
pub fn current_ids() -> (u32, u32) {
    let f = tempfile::NamedTempFile::new().unwrap();
    owner_of(f.path())
}

/// A mapping whose source range covers the ids the test runner creates files
/// with, so an untouched tree passes preflight.
pub fn mapping_covering_current_ids() -> idshift::types::IdMapping {
    let (uid, gid) = current_ids();
    let top = uid.max(gid) + 1;
    idshift::types::IdMapping::new(0, top, top).unwrap()
}
