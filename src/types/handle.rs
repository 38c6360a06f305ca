//! Offset and handle types for pool allocations.
//!
//! Allocations are addressed relative to the pool buffer, never by raw
//! pointer. This keeps handles valid across an [`expand`] (the occupied
//! prefix is copied at the same relative positions, so offsets carry over
//! unchanged) and makes misuse after [`clear`] detectable instead of
//! undefined.
//!
//! [`expand`]: crate::arena::Arena::expand
//! [`clear`]: crate::arena::Arena::clear

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte offset from the start of the pool buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaOffset(usize);

impl ArenaOffset {
    /// The base of the pool buffer.
    pub const BASE: Self = Self(0);

    /// Create a new arena offset.
    #[must_use]
    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Get the raw offset value.
    #[must_use]
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Add a byte count.
    #[must_use]
    pub const fn add(&self, bytes: usize) -> Self {
        Self(self.0 + bytes)
    }
}

impl fmt::Display for ArenaOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<usize> for ArenaOffset {
    fn from(offset: usize) -> Self {
        Self(offset)
    }
}

/// A reserved region of the pool: an offset plus a length.
///
/// The pool keeps no record of issued handles (there is no allocation
/// table), so the handle is the caller's only claim on the region. All
/// handles are invalidated together by [`clear`]; [`expand`] preserves them
/// when they are included in the caller's live list.
///
/// [`clear`]: crate::arena::Arena::clear
/// [`expand`]: crate::arena::Arena::expand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaHandle {
    /// Offset where the region starts.
    offset: ArenaOffset,
    /// Length of the region in bytes.
    len: usize,
}

impl ArenaHandle {
    /// Create a new handle.
    #[must_use]
    pub const fn new(offset: ArenaOffset, len: usize) -> Self {
        Self { offset, len }
    }

    /// Get the region's starting offset.
    #[must_use]
    pub const fn offset(&self) -> ArenaOffset {
        self.offset
    }

    /// Get the region's length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the region is zero-length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the offset one past the end of the region.
    #[must_use]
    pub const fn end(&self) -> ArenaOffset {
        self.offset.add(self.len)
    }
}

impl fmt::Display for ArenaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.offset, self.len)
    }
}
