//! Core types for phasepool.
//!
//! This module provides the fundamental types used throughout the crate:
//! - `ArenaId`: Unique identifier for a pool instance (log correlation)
//! - `ArenaOffset`: Byte offset from the start of the pool buffer
//! - `ArenaHandle`: An allocation as an offset + length index pair

mod handle;
mod ids;

pub use handle::{ArenaHandle, ArenaOffset};
pub use ids::ArenaId;
