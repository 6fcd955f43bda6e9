//! Segmented backend store.
//!
//! This module routes guest addresses to one of three independent allocations. It provides:
//! 1. **Segment Lookup:** A fixed probe order (scratchpad, video memory, main memory) that
//!    maps a masked address to its owning segment.
//! 2. **Access Routing:** Typed reads and writes delegated to the owning segment.
//! 3. **Unmapped Reporting:** Addresses outside every segment are logged and rejected.
//!
//! Used when the host cannot, or should not, reserve the full 256 MiB range.

use tracing::warn;

use super::segment::Segment;
use super::traits::MemoryBase;
use crate::common::addr::masked_range;
use crate::common::constants::{
    ADDRESS_MASK, MAINMEM_BASE, MAINMEM_SIZE, SCRATCHPAD_BASE, SCRATCHPAD_SIZE, VIDEOMEM_BASE,
    VIDEOMEM_SIZE,
};
use crate::common::error::{MemoryError, Result};

/// Guest memory split into scratchpad, video memory, and main memory.
#[derive(Debug)]
pub struct SegmentedMemory {
    scratchpad: Segment,
    videomem: Segment,
    mainmem: Segment,
}

impl SegmentedMemory {
    /// Allocates the three segments at their fixed bases.
    ///
    /// # Errors
    ///
    /// Fails if the host cannot allocate a segment.
    pub fn new() -> Result<Self> {
        Ok(Self {
            scratchpad: Segment::new("scratchpad", SCRATCHPAD_BASE, SCRATCHPAD_SIZE)?,
            videomem: Segment::new("videomem", VIDEOMEM_BASE, VIDEOMEM_SIZE)?,
            mainmem: Segment::new("mainmem", MAINMEM_BASE, MAINMEM_SIZE)?,
        })
    }

    /// Returns the segments in probe order.
    pub const fn segments(&self) -> [&Segment; 3] {
        [&self.scratchpad, &self.videomem, &self.mainmem]
    }

    /// Resolves the segment owning `address`.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no segment contains the address; the miss is logged.
    #[inline]
    pub fn segment_for(&self, address: u32) -> Result<&Segment> {
        if self.scratchpad.contains(address) {
            return Ok(&self.scratchpad);
        }
        if self.videomem.contains(address) {
            return Ok(&self.videomem);
        }
        if self.mainmem.contains(address) {
            return Ok(&self.mainmem);
        }
        Err(Self::unmapped(address))
    }

    /// Mutable counterpart of [`segment_for`](Self::segment_for).
    ///
    /// # Errors
    ///
    /// `Unmapped` if no segment contains the address; the miss is logged.
    #[inline]
    pub fn segment_for_mut(&mut self, address: u32) -> Result<&mut Segment> {
        if self.scratchpad.contains(address) {
            return Ok(&mut self.scratchpad);
        }
        if self.videomem.contains(address) {
            return Ok(&mut self.videomem);
        }
        if self.mainmem.contains(address) {
            return Ok(&mut self.mainmem);
        }
        Err(Self::unmapped(address))
    }

    fn bounds(low: u32, high: u32) -> Result<(u32, usize)> {
        masked_range(low, high).ok_or(MemoryError::OutOfBounds {
            address: low,
            length: 0,
        })
    }

    #[cold]
    fn unmapped(address: u32) -> MemoryError {
        warn!("Unmapped: {:08X}", address);
        MemoryError::Unmapped { address }
    }

    /// Copies `length` bytes from `from` to `to`.
    ///
    /// Within one segment this is a `memmove`; across segments the source is staged
    /// through an intermediate buffer.
    ///
    /// # Errors
    ///
    /// `Unmapped` if either end cannot be resolved, or `SegmentCrossing` if a range
    /// leaves its segment. Nothing is copied on failure.
    pub fn copy_within(&mut self, from: u32, to: u32, length: usize) -> Result<()> {
        let source_base = self.segment_for(from)?.base();
        if self.segment_for(to)?.base() == source_base {
            return self.segment_for_mut(to)?.copy_within(from, to, length);
        }
        let staged = self.segment_for(from)?.slice(from, length)?.to_vec();
        self.segment_for_mut(to)?
            .slice_mut(to, length)?
            .copy_from_slice(&staged);
        Ok(())
    }
}

impl MemoryBase for SegmentedMemory {
    #[inline]
    fn read_u8(&self, address: u32) -> Result<u8> {
        Ok(self.segment_for(address)?.read_u8(address))
    }

    #[inline]
    fn read_u16(&self, address: u32) -> Result<u16> {
        Ok(self.segment_for(address)?.read_u16(address))
    }

    #[inline]
    fn read_u32(&self, address: u32) -> Result<u32> {
        Ok(self.segment_for(address)?.read_u32(address))
    }

    /// Resolves the segment from the word's byte address, then reads by word index.
    #[inline]
    fn read_u32_word(&self, word_index: u32) -> Result<u32> {
        Ok(self
            .segment_for(word_index << 2)?
            .read_u32_word(word_index & (ADDRESS_MASK >> 2)))
    }

    #[inline]
    fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        self.segment_for_mut(address)?.write_u8(address, value);
        Ok(())
    }

    #[inline]
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.segment_for_mut(address)?.write_u16(address, value);
        Ok(())
    }

    #[inline]
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.segment_for_mut(address)?.write_u32(address, value);
        Ok(())
    }

    /// The range must stay inside the segment owning `low`.
    fn slice(&self, low: u32, high: u32) -> Result<&[u8]> {
        let (start, length) = Self::bounds(low, high)?;
        self.segment_for(start)?.slice(start, length)
    }

    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]> {
        let (start, length) = Self::bounds(low, high)?;
        self.segment_for_mut(start)?.slice_mut(start, length)
    }

    fn available_after_address(&self, address: u32) -> Result<usize> {
        Ok(self.segment_for(address)?.available_after_address(address))
    }
}
