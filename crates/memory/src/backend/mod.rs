//! Backend stores for guest bytes.
//!
//! This module organizes the physical storage behind the guest address space:
//! 1. **Buffer:** Host allocation (`mmap` or heap) holding raw guest bytes.
//! 2. **Contract:** The `MemoryBase` typed access trait.
//! 3. **Unified:** One flat buffer covering the whole masked range.
//! 4. **Segmented:** Scratchpad, video memory, and main memory as separate segments.
//!
//! `Backend` is the tagged variant the facade holds; it is chosen once at construction.

/// Host allocation for guest bytes.
pub mod buffer;

/// A single fixed-base segment.
pub mod segment;

/// Three-segment backend store.
pub mod segmented;

/// Typed access contract.
pub mod traits;

/// Flat backend store.
pub mod unified;

pub use segmented::SegmentedMemory;
pub use traits::MemoryBase;
pub use unified::UnifiedMemory;

use crate::common::error::Result;
use crate::config::BackendKind;

/// The active backend store.
#[derive(Debug)]
pub enum Backend {
    /// Flat 256 MiB store.
    Unified(UnifiedMemory),
    /// Scratchpad / video memory / main memory store.
    Segmented(SegmentedMemory),
}

impl Backend {
    /// Allocates the backend selected by `kind`.
    ///
    /// # Errors
    ///
    /// Fails if the host cannot allocate the backing buffers.
    pub fn new(kind: BackendKind) -> Result<Self> {
        Ok(match kind {
            BackendKind::Unified => Self::Unified(UnifiedMemory::new()?),
            BackendKind::Segmented => Self::Segmented(SegmentedMemory::new()?),
        })
    }

    /// Returns which variant is active.
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Unified(_) => BackendKind::Unified,
            Self::Segmented(_) => BackendKind::Segmented,
        }
    }

    /// Copies `length` bytes from `from` to `to` with `memmove` semantics.
    ///
    /// # Errors
    ///
    /// `Unmapped`, `OutOfBounds` or `SegmentCrossing` if either range cannot be
    /// resolved; nothing is copied.
    pub fn copy_within(&mut self, from: u32, to: u32, length: usize) -> Result<()> {
        match self {
            Self::Unified(m) => m.copy_within(from, to, length),
            Self::Segmented(m) => m.copy_within(from, to, length),
        }
    }
}

impl MemoryBase for Backend {
    #[inline(always)]
    fn read_u8(&self, address: u32) -> Result<u8> {
        match self {
            Self::Unified(m) => m.read_u8(address),
            Self::Segmented(m) => m.read_u8(address),
        }
    }

    #[inline(always)]
    fn read_u16(&self, address: u32) -> Result<u16> {
        match self {
            Self::Unified(m) => m.read_u16(address),
            Self::Segmented(m) => m.read_u16(address),
        }
    }

    #[inline(always)]
    fn read_u32(&self, address: u32) -> Result<u32> {
        match self {
            Self::Unified(m) => m.read_u32(address),
            Self::Segmented(m) => m.read_u32(address),
        }
    }

    #[inline(always)]
    fn read_u32_word(&self, word_index: u32) -> Result<u32> {
        match self {
            Self::Unified(m) => m.read_u32_word(word_index),
            Self::Segmented(m) => m.read_u32_word(word_index),
        }
    }

    #[inline(always)]
    fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        match self {
            Self::Unified(m) => m.write_u8(address, value),
            Self::Segmented(m) => m.write_u8(address, value),
        }
    }

    #[inline(always)]
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        match self {
            Self::Unified(m) => m.write_u16(address, value),
            Self::Segmented(m) => m.write_u16(address, value),
        }
    }

    #[inline(always)]
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        match self {
            Self::Unified(m) => m.write_u32(address, value),
            Self::Segmented(m) => m.write_u32(address, value),
        }
    }

    fn slice(&self, low: u32, high: u32) -> Result<&[u8]> {
        match self {
            Self::Unified(m) => m.slice(low, high),
            Self::Segmented(m) => m.slice(low, high),
        }
    }

    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]> {
        match self {
            Self::Unified(m) => m.slice_mut(low, high),
            Self::Segmented(m) => m.slice_mut(low, high),
        }
    }

    fn available_after_address(&self, address: u32) -> Result<usize> {
        match self {
            Self::Unified(m) => m.available_after_address(address),
            Self::Segmented(m) => m.available_after_address(address),
        }
    }
}
