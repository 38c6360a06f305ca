//! Error types for phasepool.
//!
//! This module provides strongly-typed errors with actionable context.
//! Every variant carries the numbers a caller needs to decide what to do
//! next (retry after [`Arena::expand`], propagate, or fix the handle).
//!
//! The reference behavior for this allocator family was to terminate the
//! process on exhaustion; here both exhaustion classes are ordinary
//! recoverable values.
//!
//! [`Arena::expand`]: crate::arena::Arena::expand

use crate::types::ArenaOffset;
use thiserror::Error;

/// The main error type for pool operations.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// The host allocator could not supply memory for a pool buffer.
    #[error("E001: Pool buffer allocation failed for {requested} bytes: {cause}")]
    AllocationFailed {
        /// Number of bytes requested from the host allocator.
        requested: usize,
        /// Reason for the failure.
        cause: String,
    },

    /// A reservation (including alignment padding) does not fit in the
    /// pool's free bytes.
    #[error("E002: Pool out of space: requested {requested} bytes, available {available} bytes")]
    OutOfSpace {
        /// Bytes needed, padding included.
        requested: usize,
        /// Bytes currently free.
        available: usize,
    },

    /// A handle does not reference the occupied region of the pool.
    ///
    /// Typically a handle that outlived a [`clear`](crate::arena::Arena::clear),
    /// or one issued by a different arena.
    #[error("E003: Invalid handle at offset {offset}: {cause}")]
    InvalidHandle {
        /// Offset stored in the rejected handle.
        offset: ArenaOffset,
        /// Reason why the handle is invalid.
        cause: String,
    },

    /// The requested initial capacity is unusable.
    #[error("E004: Invalid pool capacity {capacity}: capacity must be greater than zero")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

impl ArenaError {
    /// Get the error code (e.g., "E002").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailed { .. } => "E001",
            Self::OutOfSpace { .. } => "E002",
            Self::InvalidHandle { .. } => "E003",
            Self::InvalidCapacity { .. } => "E004",
        }
    }

    /// Check if this error is retriable after growing the pool.
    ///
    /// `OutOfSpace` is the expand-and-retry case; the other variants need
    /// caller-side fixes.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::OutOfSpace { .. })
    }
}

/// Result type alias using `ArenaError`.
pub type Result<T> = std::result::Result<T, ArenaError>;
