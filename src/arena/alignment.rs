//! Size-class alignment rules.
//!
//! Alignment is computed on arena-relative offsets, so a block reserved
//! with alignment `a` starts at an offset divisible by `a` regardless of
//! where the host allocator placed the buffer.

/// Pick the alignment for a reservation of `size` bytes.
///
/// The size classes are:
///
/// | size                        | alignment |
/// |-----------------------------|-----------|
/// | 1                           | 1         |
/// | exact power of two          | `size`    |
/// | < 8, not a power of two     | 4 if > 4, else 2 if > 2, else 1 |
/// | ≥ 8, not a power of two     | 8         |
///
/// A zero-byte reservation aligns to 1 (it lands on the current offset and
/// occupies nothing).
#[must_use]
pub fn alignment_for(size: usize) -> usize {
    if size == 1 {
        1
    } else if size.is_power_of_two() {
        size
    } else if size < 8 {
        if size > 4 {
            4
        } else if size > 2 {
            2
        } else {
            1
        }
    } else {
        8
    }
}

/// Round `offset` up to the next multiple of `align`.
///
/// `align` must be a power of two, which every value produced by
/// [`alignment_for`] is.
#[must_use]
pub fn align_up(offset: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_size_classes() {
        // size 1 and the powers of two align to themselves
        assert_eq!(alignment_for(1), 1);
        assert_eq!(alignment_for(2), 2);
        assert_eq!(alignment_for(4), 4);
        assert_eq!(alignment_for(8), 8);
        assert_eq!(alignment_for(16), 16);
        assert_eq!(alignment_for(64), 64);

        // small non-powers-of-two step down through 4 / 2
        assert_eq!(alignment_for(3), 2);
        assert_eq!(alignment_for(5), 4);
        assert_eq!(alignment_for(6), 4);
        assert_eq!(alignment_for(7), 4);

        // everything else is machine-word aligned
        assert_eq!(alignment_for(9), 8);
        assert_eq!(alignment_for(12), 8);
        assert_eq!(alignment_for(100), 8);
        assert_eq!(alignment_for(1000), 8);
    }

    #[test]
    fn alignment_for_zero() {
        assert_eq!(alignment_for(0), 1);
    }

    #[test]
    fn align_up_rounds() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(7, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 8), 16);
        assert_eq!(align_up(3, 16), 16);
        assert_eq!(align_up(5, 1), 5);
    }
}
