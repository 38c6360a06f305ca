//! The pool implementation.

use super::alignment::{align_up, alignment_for};
use crate::error::{ArenaError, Result};
use crate::types::{ArenaHandle, ArenaId, ArenaOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default pool capacity: 64 KB.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Default expansion factor.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Configuration for pool creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Initial capacity in bytes. Must be greater than zero.
    pub capacity: usize,
    /// Capacity multiplier applied by [`Arena::expand`]. Clamped to ≥ 2.
    pub growth_factor: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl ArenaConfig {
    /// Set the initial capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the expansion factor.
    #[must_use]
    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor.max(2);
        self
    }
}

/// Counters describing a pool's state and lifetime activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaStats {
    /// Total buffer capacity in bytes.
    pub capacity: usize,
    /// Bytes currently occupied, alignment padding included.
    pub occupied: usize,
    /// Bytes available for reservation.
    pub free: usize,
    /// Reservations served since creation (grow's internal reservation
    /// counts too).
    pub reservations: u64,
    /// Bytes lost to alignment padding since creation.
    pub padding_bytes: u64,
    /// Expansions performed since creation.
    pub expansions: u64,
}

/// A region-based memory pool.
///
/// The pool owns one contiguous buffer; `occupied + free == capacity` holds
/// at every observable point. Reservations only move `occupied` forward.
/// There is no per-allocation free; space comes back all at once via
/// [`clear`](Arena::clear), and the buffer itself is only replaced by
/// [`expand`](Arena::expand).
///
/// A pool is single-owner state: none of the operations lock, and sharing
/// one pool across threads requires external synchronization. Workers that
/// need concurrent arenas should each own their own instance.
///
/// Dropping the pool releases the buffer and every outstanding handle with
/// it.
pub struct Arena {
    id: ArenaId,
    buf: Vec<u8>,
    occupied: usize,
    free: usize,
    growth_factor: usize,
    reservations: u64,
    padding_bytes: u64,
    expansions: u64,
}

impl Arena {
    /// Create a pool from a configuration.
    ///
    /// The buffer is zero-initialized. Host allocation failure surfaces as
    /// [`ArenaError::AllocationFailed`]; it never terminates the process.
    pub fn create(config: &ArenaConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(ArenaError::InvalidCapacity { capacity: 0 });
        }

        let buf = alloc_buffer(config.capacity)?;
        let arena = Self {
            id: ArenaId::new(),
            free: buf.len(),
            buf,
            occupied: 0,
            growth_factor: config.growth_factor.max(2),
            reservations: 0,
            padding_bytes: 0,
            expansions: 0,
        };

        tracing::debug!(
            arena = %arena.id,
            capacity = arena.buf.len(),
            "pool created"
        );

        Ok(arena)
    }

    /// Create a pool with the given capacity and default growth factor.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::create(&ArenaConfig::default().with_capacity(capacity))
    }

    /// Get this pool's identifier.
    #[must_use]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Get the buffer capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Get the bytes currently occupied, padding included.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Get the bytes available for reservation.
    #[must_use]
    pub fn free(&self) -> usize {
        self.free
    }

    /// Get a snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.buf.len(),
            occupied: self.occupied,
            free: self.free,
            reservations: self.reservations,
            padding_bytes: self.padding_bytes,
            expansions: self.expansions,
        }
    }

    /// Reserve an aligned block of `size` bytes.
    ///
    /// The alignment is chosen per size class (see
    /// [`alignment_for`](super::alignment_for)) and applied to the
    /// arena-relative offset. Bytes skipped for alignment stay unused until
    /// the next [`clear`](Arena::clear).
    ///
    /// A `size` of zero is a defined no-op reservation: it returns an empty
    /// handle at the current offset and moves no counters.
    ///
    /// # Errors
    ///
    /// [`ArenaError::OutOfSpace`] when `padding + size` exceeds the free
    /// bytes. The pool is left untouched; callers may
    /// [`expand`](Arena::expand) and retry.
    pub fn reserve(&mut self, size: usize) -> Result<ArenaHandle> {
        let align = alignment_for(size);
        let aligned = align_up(self.occupied, align);
        let padding = aligned - self.occupied;

        // checked: a size near usize::MAX must report OutOfSpace, not wrap
        let needed = match padding.checked_add(size) {
            Some(needed) if needed <= self.free => needed,
            _ => {
                return Err(ArenaError::OutOfSpace {
                    requested: padding.saturating_add(size),
                    available: self.free,
                });
            }
        };

        self.occupied += needed;
        self.free -= needed;
        self.reservations += 1;
        self.padding_bytes += padding as u64;

        tracing::trace!(
            arena = %self.id,
            size,
            align,
            padding,
            offset = aligned,
            "block reserved"
        );

        Ok(ArenaHandle::new(ArenaOffset::new(aligned), size))
    }

    /// Reserve a block sized and filled from `data`.
    pub fn reserve_bytes(&mut self, data: &[u8]) -> Result<ArenaHandle> {
        let handle = self.reserve(data.len())?;
        let start = handle.offset().as_usize();
        self.buf[start..start + data.len()].copy_from_slice(data);
        Ok(handle)
    }

    /// Grow a reservation to at least `new_size` bytes.
    ///
    /// With `new_size <= handle.len()` this is a no-op returning the same
    /// handle; shrinking is not supported and the larger footprint is
    /// retained. Otherwise a fresh block is bump-allocated, the old
    /// contents are copied over, and the new handle is returned. The old
    /// block's space stays stranded until [`clear`](Arena::clear); the
    /// pool has no per-allocation free.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] if the handle does not lie inside the
    /// occupied region; [`ArenaError::OutOfSpace`] if the new block does
    /// not fit.
    pub fn grow(&mut self, handle: ArenaHandle, new_size: usize) -> Result<ArenaHandle> {
        self.check_handle(handle)?;

        if new_size <= handle.len() {
            return Ok(handle);
        }

        let new_handle = self.reserve(new_size)?;
        let src = handle.offset().as_usize();
        let dst = new_handle.offset().as_usize();
        self.buf.copy_within(src..src + handle.len(), dst);

        tracing::trace!(
            arena = %self.id,
            old = %handle,
            new = %new_handle,
            "block grown"
        );

        Ok(new_handle)
    }

    /// Reset occupancy to zero, keeping the buffer for reuse.
    ///
    /// The contents are not wiped; later reservations silently overwrite
    /// stale bytes. Every outstanding handle becomes logically invalid and
    /// is rejected by [`bytes`](Arena::bytes), [`grow`](Arena::grow), and
    /// [`expand`](Arena::expand) from now on.
    pub fn clear(&mut self) {
        let recycled = self.occupied;
        self.free += recycled;
        self.occupied = 0;

        tracing::debug!(arena = %self.id, recycled, "pool cleared");
    }

    /// Replace the buffer with one `growth_factor` times larger.
    ///
    /// The occupied prefix is copied at the same relative positions, so no
    /// re-alignment happens and `occupied` is unchanged. Handles are
    /// base-relative offsets and therefore carry over as-is; the `live`
    /// list is the caller's declaration of which handles it still holds,
    /// and each one is bounds-checked before anything changes. The pool
    /// cannot detect handles left off the list; keeping them is a caller
    /// obligation, exactly as in the raw-pointer formulation of this
    /// operation.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] if any listed handle falls outside the
    /// occupied region (the pool is left untouched);
    /// [`ArenaError::AllocationFailed`] if the host cannot supply the new
    /// buffer.
    pub fn expand(&mut self, live: &[ArenaHandle]) -> Result<()> {
        for handle in live {
            self.check_handle(*handle)?;
        }

        let old_capacity = self.buf.len();
        let new_capacity =
            old_capacity
                .checked_mul(self.growth_factor)
                .ok_or(ArenaError::AllocationFailed {
                    requested: usize::MAX,
                    cause: "capacity overflow".to_string(),
                })?;

        let mut new_buf = alloc_buffer(new_capacity)?;
        new_buf[..self.occupied].copy_from_slice(&self.buf[..self.occupied]);

        self.buf = new_buf;
        self.free = new_capacity - self.occupied;
        self.expansions += 1;

        tracing::debug!(
            arena = %self.id,
            old_capacity,
            new_capacity,
            live_handles = live.len(),
            "pool expanded"
        );

        Ok(())
    }

    /// Consume the pool, releasing the buffer and every outstanding handle
    /// with it.
    ///
    /// Equivalent to dropping the arena; provided for call sites that want
    /// the release to be visible.
    pub fn destroy(self) {
        tracing::debug!(arena = %self.id, "pool destroyed");
    }

    /// Borrow the bytes of a reservation.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidHandle`] if the handle does not lie inside the
    /// occupied region, typically a handle that outlived a
    /// [`clear`](Arena::clear).
    pub fn bytes(&self, handle: ArenaHandle) -> Result<&[u8]> {
        self.check_handle(handle)?;
        let start = handle.offset().as_usize();
        Ok(&self.buf[start..start + handle.len()])
    }

    /// Mutably borrow the bytes of a reservation.
    ///
    /// # Errors
    ///
    /// Same as [`bytes`](Arena::bytes).
    pub fn bytes_mut(&mut self, handle: ArenaHandle) -> Result<&mut [u8]> {
        self.check_handle(handle)?;
        let start = handle.offset().as_usize();
        Ok(&mut self.buf[start..start + handle.len()])
    }

    fn check_handle(&self, handle: ArenaHandle) -> Result<()> {
        // checked: a forged offset near usize::MAX must not wrap past the
        // occupied bound
        let end = handle
            .offset()
            .as_usize()
            .checked_add(handle.len())
            .ok_or_else(|| ArenaError::InvalidHandle {
                offset: handle.offset(),
                cause: "region end overflows the address space".to_string(),
            })?;

        if end > self.occupied {
            return Err(ArenaError::InvalidHandle {
                offset: handle.offset(),
                cause: format!(
                    "region ends at {} but only {} bytes are occupied",
                    ArenaOffset::new(end),
                    self.occupied
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("capacity", &self.buf.len())
            .field("occupied", &self.occupied)
            .field("free", &self.free)
            .finish()
    }
}

/// Allocate a zero-filled buffer, surfacing host failure as an error.
fn alloc_buffer(capacity: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|e| ArenaError::AllocationFailed {
            requested: capacity,
            cause: e.to_string(),
        })?;
    buf.resize(capacity, 0);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant_holds(arena: &Arena) -> bool {
        arena.occupied() + arena.free() == arena.capacity()
    }

    #[test]
    fn create_rejects_zero_capacity() {
        let err = Arena::with_capacity(0).unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn create_initial_counters() {
        let arena = Arena::with_capacity(128).unwrap();
        assert_eq!(arena.capacity(), 128);
        assert_eq!(arena.occupied(), 0);
        assert_eq!(arena.free(), 128);
        assert!(invariant_holds(&arena));
    }

    #[test]
    fn reserve_starts_at_base() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve(3).unwrap();
        assert_eq!(handle.offset(), ArenaOffset::BASE);
        assert_eq!(handle.len(), 3);
        assert_eq!(arena.occupied(), 3);
        assert_eq!(arena.free(), 61);
    }

    #[test]
    fn reserve_pads_to_size_class() {
        let mut arena = Arena::with_capacity(64).unwrap();
        arena.reserve(3).unwrap();

        // occupied = 3; a 16-byte block must land on a 16-byte boundary
        let handle = arena.reserve(16).unwrap();
        assert_eq!(handle.offset().as_usize(), 16);
        assert_eq!(arena.occupied(), 32);
        assert!(invariant_holds(&arena));
    }

    #[test]
    fn reserve_tracks_padding_in_stats() {
        let mut arena = Arena::with_capacity(64).unwrap();
        arena.reserve(3).unwrap();
        arena.reserve(16).unwrap();

        let stats = arena.stats();
        assert_eq!(stats.reservations, 2);
        assert_eq!(stats.padding_bytes, 13);
        assert_eq!(stats.occupied, 32);
        assert_eq!(stats.free, 32);
    }

    #[test]
    fn reserve_exact_fit_succeeds() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve(64).unwrap();
        assert_eq!(handle.offset(), ArenaOffset::BASE);
        assert_eq!(arena.free(), 0);
    }

    #[test]
    fn reserve_one_past_free_fails() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let err = arena.reserve(65).unwrap_err();
        match err {
            ArenaError::OutOfSpace {
                requested,
                available,
            } => {
                assert_eq!(requested, 65);
                assert_eq!(available, 64);
            }
            other => panic!("expected OutOfSpace, got {other}"),
        }
        // failure leaves the pool untouched
        assert_eq!(arena.occupied(), 0);
        assert_eq!(arena.free(), 64);
    }

    #[test]
    fn reserve_near_usize_max_reports_out_of_space() {
        let mut arena = Arena::with_capacity(64).unwrap();
        arena.reserve(1).unwrap();

        // padding + size would wrap; must surface as OutOfSpace, not wrap
        // into a bogus grant
        let err = arena.reserve(usize::MAX - 3).unwrap_err();
        match err {
            ArenaError::OutOfSpace { available, .. } => assert_eq!(available, 63),
            other => panic!("expected OutOfSpace, got {other}"),
        }

        assert_eq!(arena.occupied(), 1);
        assert_eq!(arena.free(), 63);
        assert!(invariant_holds(&arena));

        // still usable afterwards
        let handle = arena.reserve_bytes(b"ok").unwrap();
        assert_eq!(arena.bytes(handle).unwrap(), b"ok");
    }

    #[test]
    fn reserve_zero_is_a_defined_no_op() {
        let mut arena = Arena::with_capacity(16).unwrap();
        arena.reserve(5).unwrap();

        let empty = arena.reserve(0).unwrap();
        assert_eq!(empty.offset().as_usize(), 5);
        assert!(empty.is_empty());
        assert_eq!(arena.occupied(), 5);
        assert_eq!(arena.bytes(empty).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn reserve_bytes_copies_data() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve_bytes(b"phase data").unwrap();
        assert_eq!(arena.bytes(handle).unwrap(), b"phase data");
    }

    #[test]
    fn grow_noop_when_not_larger() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve_bytes(b"12345678").unwrap();
        let before = arena.stats();

        assert_eq!(arena.grow(handle, 8).unwrap(), handle);
        assert_eq!(arena.grow(handle, 3).unwrap(), handle);

        let after = arena.stats();
        assert_eq!(before.occupied, after.occupied);
        assert_eq!(before.free, after.free);
    }

    #[test]
    fn grow_copies_into_fresh_block() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let small = arena.reserve_bytes(b"abcd").unwrap();
        arena.reserve_bytes(b"xxxx").unwrap();

        let grown = arena.grow(small, 16).unwrap();
        assert_ne!(grown.offset(), small.offset());
        assert_eq!(grown.len(), 16);
        assert_eq!(&arena.bytes(grown).unwrap()[..4], b"abcd");

        // the old block is stranded but still readable
        assert_eq!(arena.bytes(small).unwrap(), b"abcd");
        assert!(invariant_holds(&arena));
    }

    #[test]
    fn grow_accounts_the_delta() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve(8).unwrap();
        let occupied_before = arena.occupied();

        // 24 bytes take 8-byte alignment; offset 8 is already aligned
        let grown = arena.grow(handle, 24).unwrap();
        assert_eq!(grown.offset().as_usize(), 8);
        assert_eq!(arena.occupied(), occupied_before + 24);
        assert!(invariant_holds(&arena));
    }

    #[test]
    fn grow_rejects_foreign_handle() {
        let mut arena = Arena::with_capacity(32).unwrap();
        arena.reserve(4).unwrap();

        let bogus = ArenaHandle::new(ArenaOffset::new(16), 8);
        let err = arena.grow(bogus, 32).unwrap_err();
        assert_eq!(err.code(), "E003");
    }

    #[test]
    fn forged_handle_with_wrapping_end_is_rejected() {
        let mut arena = Arena::with_capacity(32).unwrap();
        let valid = arena.reserve(8).unwrap();

        // offset + len wraps around the address space; every entry point
        // must answer InvalidHandle instead of panicking
        let forged = ArenaHandle::new(ArenaOffset::new(usize::MAX - 4), 8);
        assert_eq!(arena.bytes(forged).unwrap_err().code(), "E003");
        assert_eq!(arena.bytes_mut(forged).unwrap_err().code(), "E003");
        assert_eq!(arena.grow(forged, 16).unwrap_err().code(), "E003");
        assert_eq!(arena.expand(&[valid, forged]).unwrap_err().code(), "E003");
        assert_eq!(arena.capacity(), 32);
    }

    #[test]
    fn clear_recycles_everything() {
        let mut arena = Arena::with_capacity(64).unwrap();
        let handle = arena.reserve_bytes(b"stale").unwrap();
        arena.reserve(16).unwrap();

        arena.clear();
        assert_eq!(arena.occupied(), 0);
        assert_eq!(arena.free(), 64);
        assert!(invariant_holds(&arena));

        // handles from before the clear are rejected
        assert_eq!(arena.bytes(handle).unwrap_err().code(), "E003");

        // reset law: the next reservation lands at the base again
        let fresh = arena.reserve(64).unwrap();
        assert_eq!(fresh.offset(), ArenaOffset::BASE);
    }

    #[test]
    fn expand_doubles_and_preserves_contents() {
        let mut arena = Arena::with_capacity(32).unwrap();
        let a = arena.reserve_bytes(b"alpha").unwrap();
        let b = arena.reserve_bytes(&[7u8; 16]).unwrap();
        let occupied_before = arena.occupied();

        arena.expand(&[a, b]).unwrap();

        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.occupied(), occupied_before);
        assert_eq!(arena.free(), 64 - occupied_before);
        assert!(invariant_holds(&arena));

        // offsets from the old buffer base carry over unchanged
        assert_eq!(arena.bytes(a).unwrap(), b"alpha");
        assert_eq!(arena.bytes(b).unwrap(), &[7u8; 16]);
    }

    #[test]
    fn expand_rejects_stale_handle_before_mutating() {
        let mut arena = Arena::with_capacity(32).unwrap();
        let handle = arena.reserve(8).unwrap();
        arena.clear();

        let err = arena.expand(&[handle]).unwrap_err();
        assert_eq!(err.code(), "E003");
        assert_eq!(arena.capacity(), 32);
    }

    #[test]
    fn expand_honors_growth_factor() {
        let config = ArenaConfig::default()
            .with_capacity(16)
            .with_growth_factor(4);
        let mut arena = Arena::create(&config).unwrap();

        arena.expand(&[]).unwrap();
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.stats().expansions, 1);
    }

    #[test]
    fn growth_factor_is_clamped() {
        let config = ArenaConfig::default()
            .with_capacity(16)
            .with_growth_factor(0);
        let mut arena = Arena::create(&config).unwrap();

        arena.expand(&[]).unwrap();
        assert_eq!(arena.capacity(), 32);
    }

    #[test]
    fn bytes_mut_writes_through() {
        let mut arena = Arena::with_capacity(16).unwrap();
        let handle = arena.reserve(4).unwrap();

        arena.bytes_mut(handle).unwrap().copy_from_slice(b"beef");
        assert_eq!(arena.bytes(handle).unwrap(), b"beef");
    }

    #[test]
    fn debug_omits_buffer_contents() {
        let arena = Arena::with_capacity(8).unwrap();
        let repr = format!("{arena:?}");
        assert!(repr.contains("capacity"));
        assert!(!repr.contains("buf"));
    }
}
