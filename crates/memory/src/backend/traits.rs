//! Typed access contract for guest memory.
//!
//! This module defines the `MemoryBase` trait implemented by both backend stores and by the
//! [`AddressSpace`](crate::AddressSpace) facade. It provides:
//! 1. **Typed Access:** Byte, half-word, and word reads/writes at guest addresses.
//! 2. **Reinterpretation:** Signed and float variants derived from the unsigned storage path.
//! 3. **Word Indexing:** The alternate word-indexed read used by the content hash.
//! 4. **Views:** Zero-copy slices and the remaining-bytes query used to default lengths.
//!
//! Every method masks its address before use. Typed accessors align the resolved offset
//! down to their width. Values are stored little-endian.

use crate::common::error::Result;

/// Typed read/write contract over a guest address space.
///
/// Implementors re-derive the buffer offset on every call; nothing is cached between
/// accesses. Writes truncate to the access width.
pub trait MemoryBase {
    /// Reads an unsigned byte.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn read_u8(&self, address: u32) -> Result<u8>;
    /// Reads an unsigned half-word.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn read_u16(&self, address: u32) -> Result<u16>;
    /// Reads an unsigned word.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn read_u32(&self, address: u32) -> Result<u32>;

    /// Reads the word at `word_index` (a byte address shifted right by two).
    ///
    /// Must not be mixed with byte-addressed reads; only the content hash uses it.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves the word's byte address.
    fn read_u32_word(&self, word_index: u32) -> Result<u32>;

    /// Writes a byte.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn write_u8(&mut self, address: u32, value: u8) -> Result<()>;
    /// Writes a half-word.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()>;
    /// Writes a word.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()>;

    /// Returns a zero-copy view of `[low, high)`.
    ///
    /// Both bounds are masked. A `high` that masks to zero while differing from `low`
    /// names the top of the address space.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the masked range is inverted or exceeds the store, `Unmapped`
    /// if `low` cannot be resolved, and `SegmentCrossing` if the range leaves its segment.
    fn slice(&self, low: u32, high: u32) -> Result<&[u8]>;
    /// Returns a mutable zero-copy view of `[low, high)`.
    ///
    /// Writes through the view bypass write breakpoints.
    ///
    /// # Errors
    ///
    /// As for [`slice`](Self::slice).
    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]>;

    /// Bytes remaining from `address` to the end of its backing buffer.
    ///
    /// # Errors
    ///
    /// `Unmapped` if no backing store resolves `address`.
    fn available_after_address(&self, address: u32) -> Result<usize>;

    /// Reads a sign-extended byte.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn read_i8(&self, address: u32) -> Result<i8> {
        Ok(self.read_u8(address)? as i8)
    }

    /// Reads a sign-extended half-word.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn read_i16(&self, address: u32) -> Result<i16> {
        Ok(self.read_u16(address)? as i16)
    }

    /// Reads a signed word.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn read_i32(&self, address: u32) -> Result<i32> {
        Ok(self.read_u32(address)? as i32)
    }

    /// Reads an IEEE-754 single.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn read_f32(&self, address: u32) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32(address)?))
    }

    /// Writes a signed byte.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn write_i8(&mut self, address: u32, value: i8) -> Result<()> {
        self.write_u8(address, value as u8)
    }

    /// Writes a signed half-word.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn write_i16(&mut self, address: u32, value: i16) -> Result<()> {
        self.write_u16(address, value as u16)
    }

    /// Writes a signed word.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn write_i32(&mut self, address: u32, value: i32) -> Result<()> {
        self.write_u32(address, value as u32)
    }

    /// Writes an IEEE-754 single.
    ///
    /// # Errors
    ///
    /// As for the unsigned access it is built on.
    #[inline]
    fn write_f32(&mut self, address: u32, value: f32) -> Result<()> {
        self.write_u32(address, value.to_bits())
    }
}
