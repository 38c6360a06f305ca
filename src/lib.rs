//! Phasepool Core Library
//!
//! This crate provides a region-based ("arena") memory pool for data whose
//! lifetime is tied to a phase of computation (one parse pass, one frame,
//! one request) rather than to individual object lifetimes.
//!
//! # Overview
//!
//! A pool is one contiguous byte buffer plus two counters (`occupied` and
//! `free`). Allocations are carved out by bumping the occupied counter
//! forward, with alignment chosen per size class. There is no per-allocation
//! free: the whole pool is recycled at once with [`Arena::clear`], and the
//! pool can double its capacity with [`Arena::expand`] while keeping
//! caller-held handles valid.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ buffer                                                       │
//! │ ┌─────┬──┬────────┬─────┬──────────────────────────────────┐ │
//! │ │ A1  │··│   A2   │ A3  │           free space             │ │
//! │ └─────┴──┴────────┴─────┴──────────────────────────────────┘ │
//! │            ▲ padding      ▲ occupied                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Components
//!
//! - **Arena**: the pool itself and its four operations (reserve, grow,
//!   clear, expand)
//! - **Types**: arena-relative offsets and allocation handles; handles are
//!   indices into the pool, never raw addresses
//! - **Errors**: recoverable, coded error values; exhaustion never
//!   terminates the process
//!
//! # Example
//!
//! ```
//! use phasepool::{Arena, Result};
//!
//! fn run() -> Result<()> {
//!     let mut arena = Arena::with_capacity(64)?;
//!
//!     // Reserve an aligned block and fill it.
//!     let handle = arena.reserve_bytes(b"hello")?;
//!     assert_eq!(arena.bytes(handle)?, b"hello");
//!
//!     // Out of space? Expand, then retry.
//!     let live = [handle];
//!     if arena.reserve(256).is_err() {
//!         arena.expand(&live)?;
//!     }
//!     let big = arena.reserve(96)?;
//!     assert_eq!(arena.bytes(big)?.len(), 96);
//!
//!     // Recycle everything at once.
//!     arena.clear();
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod error;
pub mod prelude;
pub mod types;

// Re-export key types at crate root for convenience
pub use arena::{Arena, ArenaConfig, ArenaStats};
pub use error::{ArenaError, Result};
pub use types::{ArenaHandle, ArenaId, ArenaOffset};
