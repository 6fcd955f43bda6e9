//! Guest address helpers.
//!
//! This module holds the pure address arithmetic shared by every layer. It provides:
//! 1. **Masking:** Reducing a 32-bit guest address to its 28 significant bits.
//! 2. **Range Tests:** Half-open range membership on masked operands.
//! 3. **Validity Policy:** The region-pattern predicate used to reject pointers before
//!    they are dereferenced, independent of whether a backend can resolve them.

use super::constants::{
    ADDRESS_MASK, DEFAULT_FRAME_ADDRESS, DEFAULT_FRAME_SIZE, MAINMEM_BASE, MAINMEM_MIRROR_MASK,
    MAINMEM_WINDOW_END, SCRATCHPAD_ALIAS_MASK, SCRATCHPAD_BASE, UNIFIED_SIZE, VIDEOMEM_BASE,
    VIDEOMEM_MIRROR_MASK,
};

/// Reduces a guest address to its significant 28 bits.
#[inline(always)]
pub const fn mask(address: u32) -> u32 {
    address & ADDRESS_MASK
}

/// Masks both ends of `[low, high)` and returns the masked start and the length.
///
/// The bounds may carry different mirror prefixes. A `high` that masks to zero while
/// differing from `low` is the exclusive end of the whole space.
///
/// Returns `None` when the masked end lies below the masked start.
#[inline]
pub const fn masked_range(low: u32, high: u32) -> Option<(u32, usize)> {
    let start = mask(low);
    let end = if mask(high) == 0 && high != low {
        UNIFIED_SIZE
    } else {
        mask(high) as usize
    };
    if end < start as usize {
        None
    } else {
        Some((start, end - start as usize))
    }
}

/// Returns `true` if `address` is the guest null pointer.
///
/// Only the literal value 0 is null; `0x1000_0000` masks to zero but is not null.
#[inline(always)]
pub const fn is_null(address: u32) -> bool {
    address == 0
}

/// Half-open range test `[min, max)` performed after masking all three operands.
///
/// # Arguments
///
/// * `address` - Address to test.
/// * `min` - Inclusive lower bound.
/// * `max` - Exclusive upper bound.
#[inline]
pub const fn is_address_in_range(address: u32, min: u32, max: u32) -> bool {
    let address = mask(address);
    let min = mask(min);
    let max = mask(max);
    address >= min && address < max
}

/// Returns `true` if `address` falls in one of the recognised guest regions.
///
/// Recognised regions are the main-memory and video-memory mirror ranges, the
/// scratchpad alias range, the default frame buffer, and the full 64 MiB
/// main-memory window. A valid address is not necessarily resolvable by the
/// segmented backend (mirrors are valid but unmapped there).
pub const fn is_valid_address(address: u32) -> bool {
    let address = mask(address);
    if (address & MAINMEM_MIRROR_MASK) == MAINMEM_BASE {
        return true;
    }
    if (address & VIDEOMEM_MIRROR_MASK) == VIDEOMEM_BASE {
        return true;
    }
    if (address & SCRATCHPAD_ALIAS_MASK) == SCRATCHPAD_BASE {
        return true;
    }
    if is_address_in_range(
        address,
        DEFAULT_FRAME_ADDRESS,
        DEFAULT_FRAME_ADDRESS + DEFAULT_FRAME_SIZE,
    ) {
        return true;
    }
    is_address_in_range(address, MAINMEM_BASE, MAINMEM_WINDOW_END)
}
