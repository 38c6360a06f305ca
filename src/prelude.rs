//! Prelude for convenient imports.
//!
//! ```
//! use phasepool::prelude::*;
//! ```

// Core types
pub use crate::types::{ArenaHandle, ArenaId, ArenaOffset};

// Error handling
pub use crate::error::{ArenaError, Result};

// The pool
pub use crate::arena::{Arena, ArenaConfig, ArenaStats};
