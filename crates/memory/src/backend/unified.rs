//! Unified backend store.
//!
//! One contiguous allocation spanning the whole masked address range. Every guest address
//! is its own buffer offset after masking, so typed accesses are a mask, an alignment, and
//! an index. Nothing can be unmapped.

use super::buffer::GuestBuffer;
use super::traits::MemoryBase;
use crate::common::addr::{mask, masked_range};
use crate::common::constants::{ADDRESS_MASK, UNIFIED_SIZE};
use crate::common::data::AccessWidth;
use crate::common::error::{MemoryError, Result};

/// Flat guest memory covering `[0, ADDRESS_MASK]`.
#[derive(Debug)]
pub struct UnifiedMemory {
    buffer: GuestBuffer,
}

impl UnifiedMemory {
    /// Allocates the 256 MiB backing buffer.
    ///
    /// # Errors
    ///
    /// Fails if the host cannot reserve the range.
    pub fn new() -> Result<Self> {
        Ok(Self {
            buffer: GuestBuffer::new(UNIFIED_SIZE)?,
        })
    }

    #[inline(always)]
    const fn offset(address: u32, width: AccessWidth) -> usize {
        width.align(mask(address) as usize)
    }

    /// Resolves `[low, high)` to a buffer start and length, masking both bounds.
    fn range(&self, low: u32, high: u32) -> Result<(usize, usize)> {
        let (start, length) = masked_range(low, high).ok_or(MemoryError::OutOfBounds {
            address: low,
            length: 0,
        })?;
        let start = start as usize;
        if start + length > self.buffer.len() {
            return Err(MemoryError::OutOfBounds {
                address: low,
                length,
            });
        }
        Ok((start, length))
    }

    /// Copies `length` bytes from `from` to `to`; overlapping ranges behave like `memmove`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if either range runs past the top of the space.
    pub fn copy_within(&mut self, from: u32, to: u32, length: usize) -> Result<()> {
        let src = mask(from) as usize;
        let dst = mask(to) as usize;
        if src + length > self.buffer.len() {
            return Err(MemoryError::OutOfBounds {
                address: from,
                length,
            });
        }
        if dst + length > self.buffer.len() {
            return Err(MemoryError::OutOfBounds {
                address: to,
                length,
            });
        }
        self.buffer.as_mut_slice().copy_within(src..src + length, dst);
        Ok(())
    }
}

impl MemoryBase for UnifiedMemory {
    #[inline(always)]
    fn read_u8(&self, address: u32) -> Result<u8> {
        Ok(self.buffer.read_u8(Self::offset(address, AccessWidth::Byte)))
    }

    #[inline(always)]
    fn read_u16(&self, address: u32) -> Result<u16> {
        Ok(self.buffer.read_u16(Self::offset(address, AccessWidth::Half)))
    }

    #[inline(always)]
    fn read_u32(&self, address: u32) -> Result<u32> {
        Ok(self.buffer.read_u32(Self::offset(address, AccessWidth::Word)))
    }

    #[inline(always)]
    fn read_u32_word(&self, word_index: u32) -> Result<u32> {
        let offset = ((word_index & (ADDRESS_MASK >> 2)) as usize) << 2;
        Ok(self.buffer.read_u32(offset))
    }

    #[inline(always)]
    fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        self.buffer
            .write_u8(Self::offset(address, AccessWidth::Byte), value);
        Ok(())
    }

    #[inline(always)]
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.buffer
            .write_u16(Self::offset(address, AccessWidth::Half), value);
        Ok(())
    }

    #[inline(always)]
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.buffer
            .write_u32(Self::offset(address, AccessWidth::Word), value);
        Ok(())
    }

    fn slice(&self, low: u32, high: u32) -> Result<&[u8]> {
        let (start, length) = self.range(low, high)?;
        Ok(&self.buffer.as_slice()[start..start + length])
    }

    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]> {
        let (start, length) = self.range(low, high)?;
        Ok(&mut self.buffer.as_mut_slice()[start..start + length])
    }

    fn available_after_address(&self, address: u32) -> Result<usize> {
        Ok(self.buffer.len() - mask(address) as usize)
    }
}
