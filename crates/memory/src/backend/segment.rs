//! A single backing segment of the segmented store.
//!
//! A segment owns one buffer mapped at a fixed guest base. Its accessors take guest
//! addresses, mask them, subtract the base, and align to the access width. Callers must
//! have checked [`Segment::contains`] first.

use super::buffer::GuestBuffer;
use crate::common::addr::mask;
use crate::common::data::AccessWidth;
use crate::common::error::{MemoryError, Result};

/// A named, fixed-base region of guest memory.
#[derive(Debug)]
pub struct Segment {
    name: &'static str,
    base: u32,
    buffer: GuestBuffer,
}

impl Segment {
    /// Allocates a zeroed segment of `size` bytes mapped at `base`.
    ///
    /// # Arguments
    ///
    /// * `name` - Short name used in diagnostics (e.g., `"mainmem"`).
    /// * `base` - Masked guest address of the first byte.
    /// * `size` - Size in bytes; must be a multiple of 4.
    ///
    /// # Errors
    ///
    /// Fails if the host cannot allocate the buffer.
    pub fn new(name: &'static str, base: u32, size: usize) -> Result<Self> {
        Ok(Self {
            name,
            base,
            buffer: GuestBuffer::new(size)?,
        })
    }

    /// Returns the segment name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the guest base address.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Returns the size in bytes.
    pub const fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `(base, size)` for routing, like a bus device's address range.
    pub const fn address_range(&self) -> (u32, usize) {
        (self.base, self.buffer.len())
    }

    /// Returns `true` if the masked address lies in `[base, base + size)`.
    #[inline(always)]
    pub const fn contains(&self, address: u32) -> bool {
        let address = mask(address) as usize;
        let base = self.base as usize;
        address >= base && address < base + self.buffer.len()
    }

    #[inline(always)]
    const fn offset(&self, address: u32, width: AccessWidth) -> usize {
        width.align((mask(address) - self.base) as usize)
    }

    /// Reads a byte at a guest address inside this segment.
    #[inline(always)]
    pub const fn read_u8(&self, address: u32) -> u8 {
        self.buffer.read_u8(self.offset(address, AccessWidth::Byte))
    }

    /// Reads a half-word at a guest address inside this segment.
    #[inline(always)]
    pub fn read_u16(&self, address: u32) -> u16 {
        self.buffer.read_u16(self.offset(address, AccessWidth::Half))
    }

    /// Reads a word at a guest address inside this segment.
    #[inline(always)]
    pub fn read_u32(&self, address: u32) -> u32 {
        self.buffer.read_u32(self.offset(address, AccessWidth::Word))
    }

    /// Reads the word at a global word index inside this segment.
    #[inline(always)]
    pub fn read_u32_word(&self, word_index: u32) -> u32 {
        let local = (word_index - (self.base >> 2)) as usize;
        self.buffer.read_u32(local << 2)
    }

    /// Writes a byte at a guest address inside this segment.
    #[inline(always)]
    pub const fn write_u8(&mut self, address: u32, value: u8) {
        let offset = self.offset(address, AccessWidth::Byte);
        self.buffer.write_u8(offset, value);
    }

    /// Writes a half-word at a guest address inside this segment.
    #[inline(always)]
    pub fn write_u16(&mut self, address: u32, value: u16) {
        let offset = self.offset(address, AccessWidth::Half);
        self.buffer.write_u16(offset, value);
    }

    /// Writes a word at a guest address inside this segment.
    #[inline(always)]
    pub fn write_u32(&mut self, address: u32, value: u32) {
        let offset = self.offset(address, AccessWidth::Word);
        self.buffer.write_u32(offset, value);
    }

    /// Resolves `[low, low + length)` to a local buffer range.
    ///
    /// # Errors
    ///
    /// `SegmentCrossing` if the range runs past the end of this segment.
    const fn local_range(&self, low: u32, length: usize) -> Result<(usize, usize)> {
        let start = (mask(low) - self.base) as usize;
        if start + length > self.buffer.len() {
            return Err(MemoryError::SegmentCrossing {
                low,
                high: low.wrapping_add(length as u32),
            });
        }
        Ok((start, start + length))
    }

    /// Zero-copy view of `length` bytes starting at guest address `low`.
    ///
    /// # Errors
    ///
    /// `SegmentCrossing` if the range runs past the end of this segment.
    pub fn slice(&self, low: u32, length: usize) -> Result<&[u8]> {
        let (start, end) = self.local_range(low, length)?;
        Ok(&self.buffer.as_slice()[start..end])
    }

    /// Mutable zero-copy view of `length` bytes starting at guest address `low`.
    ///
    /// # Errors
    ///
    /// `SegmentCrossing` if the range runs past the end of this segment.
    pub fn slice_mut(&mut self, low: u32, length: usize) -> Result<&mut [u8]> {
        let (start, end) = self.local_range(low, length)?;
        Ok(&mut self.buffer.as_mut_slice()[start..end])
    }

    /// Copies within this segment with `memmove` semantics.
    ///
    /// # Errors
    ///
    /// `SegmentCrossing` if either range runs past the end of this segment.
    pub fn copy_within(&mut self, from: u32, to: u32, length: usize) -> Result<()> {
        let (src, src_end) = self.local_range(from, length)?;
        let (dst, _) = self.local_range(to, length)?;
        self.buffer.as_mut_slice().copy_within(src..src_end, dst);
        Ok(())
    }

    /// Bytes from `address` to the end of this segment.
    pub const fn available_after_address(&self, address: u32) -> usize {
        self.buffer.len() - (mask(address) - self.base) as usize
    }
}
