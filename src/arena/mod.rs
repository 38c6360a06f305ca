//! The memory pool and its operations.
//!
//! An [`Arena`] owns one contiguous byte buffer and serves allocations by
//! bumping an occupied counter forward. Four operations act on it:
//!
//! - **Reserve**: bump-allocate an aligned block ([`Arena::reserve`])
//! - **Grow**: widen a reservation by allocating a fresh block and copying
//!   ([`Arena::grow`])
//! - **Clear**: recycle the whole pool at once ([`Arena::clear`])
//! - **Expand**: replace the buffer with one `growth_factor` times larger,
//!   keeping listed handles valid ([`Arena::expand`])
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ ┌────────┬···┬──────────┬───┬─────────┬────────────────────────┐ │
//! │ │ block  │pad│  block   │pad│  block  │       free space       │ │
//! │ └────────┴───┴──────────┴───┴─────────┴────────────────────────┘ │
//! │ 0                                     ▲ occupied        capacity │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Padding bytes satisfy the per-size alignment rule (see
//! [`alignment_for`]) and stay unused until the next clear.

mod alignment;
mod pool;

pub use alignment::{align_up, alignment_for};
pub use pool::{Arena, ArenaConfig, ArenaStats, DEFAULT_CAPACITY, DEFAULT_GROWTH_FACTOR};
