//! Validated id range mapping.
//!
//! An `IdMapping` rewrites identifiers from the half-open source range
//! `[from, from + count)` into the target range `[to, to + count)`. The two
//! ranges must be disjoint and neither may overflow the `u32` id space.
//! Immutable once validated; computed once at startup and read by every
//! traversal pass.

use thiserror::Error;

/// Which half of a mapping an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeEnd {
    Source,
    Target,
}

impl std::fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEnd::Source => write!(f, "from"),
            RangeEnd::Target => write!(f, "to"),
        }
    }
}

/// Validation failures for an id mapping. Fatal, reported before any
/// traversal begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("integer overflow: {end} {base} + {count} exceeds the id space")]
    Overflow { end: RangeEnd, base: u32, count: u32 },
    #[error("ranges overlap: [{from}, {from_end}) and [{to}, {to_end})")]
    Overlap {
        from: u32,
        from_end: u32,
        to: u32,
        to_end: u32,
    },
    #[error("count must be nonzero")]
    EmptyCount,
}

/// A validated source-to-target id range mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdMapping {
    from: u32,
    to: u32,
    count: u32,
}

impl IdMapping {
    /// Validate and construct a mapping.
    ///
    /// Rejects a zero `count`, either range overflowing `u32`, and any overlap
    /// between the two ranges. Equal `from` and `to` always overlap and are
    /// rejected; a no-op run needs no remapping tool.
    pub fn new(from: u32, to: u32, count: u32) -> Result<Self, RangeError> {
        if count == 0 {
            return Err(RangeError::EmptyCount);
        }
        let from_end = from.checked_add(count).ok_or(RangeError::Overflow {
            end: RangeEnd::Source,
            base: from,
            count,
        })?;
        let to_end = to.checked_add(count).ok_or(RangeError::Overflow {
            end: RangeEnd::Target,
            base: to,
            count,
        })?;
        if from < to_end && to < from_end {
            return Err(RangeError::Overlap {
                from,
                from_end,
                to,
                to_end,
            });
        }
        Ok(Self { from, to, count })
    }

    pub fn from(&self) -> u32 {
        self.from
    }

    pub fn to(&self) -> u32 {
        self.to
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Signed distance from source to target range, applied uniformly to
    /// every in-range identifier.
    pub fn delta(&self) -> i64 {
        i64::from(self.to) - i64::from(self.from)
    }

    /// Whether `id` lies in the source range `[from, from + count)`.
    pub fn in_source(&self, id: u32) -> bool {
        id >= self.from && id - self.from < self.count
    }

    /// Whether `id` lies in the target range `[to, to + count)`.
    pub fn in_target(&self, id: u32) -> bool {
        id >= self.to && id - self.to < self.count
    }

    /// Remap an in-source identifier: `id - from + to`.
    ///
    /// The result stays within `[to, to + count)` for any id the source range
    /// contains, so the arithmetic cannot overflow after validation.
    pub fn apply(&self, id: u32) -> u32 {
        debug_assert!(self.in_source(id));
        self.to + (id - self.from)
    }

    /// Exclusive upper bound of the source range, for diagnostics.
    pub fn source_end(&self) -> u32 {
        self.from + self.count
    }
}
