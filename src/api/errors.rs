//! Stable error identifiers carried in facts.
//!
//! The process exit contract stays 0/1; these ids exist so fact consumers can
//! route failures without parsing messages.

use crate::fixer::FixError;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_RANGE,
    E_WALK,
    E_STAT,
    E_CLASSIFY,
    E_HOOK,
    E_CHOWN,
    E_CONSISTENCY,
    E_VERIFY,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_RANGE => "E_RANGE",
        ErrorId::E_WALK => "E_WALK",
        ErrorId::E_STAT => "E_STAT",
        ErrorId::E_CLASSIFY => "E_CLASSIFY",
        ErrorId::E_HOOK => "E_HOOK",
        ErrorId::E_CHOWN => "E_CHOWN",
        ErrorId::E_CONSISTENCY => "E_CONSISTENCY",
        ErrorId::E_VERIFY => "E_VERIFY",
    }
}

/// Map a fixer error onto its stable id.
#[must_use]
pub fn id_for(err: &FixError) -> ErrorId {
    match err {
        FixError::UnreadableDir { .. } => ErrorId::E_WALK,
        FixError::StatFailed { .. } => ErrorId::E_STAT,
        FixError::OutOfRange { .. } => ErrorId::E_CLASSIFY,
        FixError::Hook { .. } => ErrorId::E_HOOK,
        FixError::Chown { .. } => ErrorId::E_CHOWN,
        FixError::RangeDisagreement { .. } => ErrorId::E_CONSISTENCY,
        FixError::VerifyStat { .. } | FixError::VerifyMode { .. } | FixError::VerifyId { .. } => {
            ErrorId::E_VERIFY
        }
    }
}
