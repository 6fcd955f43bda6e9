//! Bulk operations on the address space.
//!
//! Each writing operation here changes a whole range and then runs exactly one breakpoint
//! scan over it, never one per element. The exception is [`AddressSpace::write_stream`],
//! which feeds the per-byte instrumented path and then scans the whole range once more.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::AddressSpace;
use crate::backend::MemoryBase;
use crate::common::addr::masked_range;
use crate::common::constants::{
    DEFAULT_FRAME_ADDRESS, DEFAULT_FRAME_SIZE, DUMP_SIZE, MAINMEM_BASE,
};
use crate::common::error::{MemoryError, Result};
use crate::ops::{self, span};
use crate::view::MemoryStream;

impl AddressSpace {
    /// Zeroes the default frame buffer window.
    ///
    /// # Errors
    ///
    /// `Unmapped` if the backend has no video memory at the frame address.
    pub fn reset(&mut self) -> Result<()> {
        self.memset(DEFAULT_FRAME_ADDRESS, 0, DEFAULT_FRAME_SIZE as i32)
    }

    /// Copies `length` bytes from `from` to `to` as if through a temporary buffer.
    ///
    /// A non-positive `length` is a no-op. Overlapping ranges are handled.
    ///
    /// # Errors
    ///
    /// `Unmapped` or `OutOfBounds` if either range cannot be resolved; nothing is copied.
    pub fn copy(&mut self, from: u32, to: u32, length: i32) -> Result<()> {
        if length <= 0 {
            return Ok(());
        }
        let length = length as usize;
        trace!("copy 0x{:08X} -> 0x{:08X} ({} bytes)", from, to, length);
        self.backend.copy_within(from, to, length)?;
        self.check_write_breakpoints(to, length);
        Ok(())
    }

    /// Fills `length` bytes at `address` with the low byte of `value`.
    ///
    /// A non-positive `length` is a no-op.
    ///
    /// # Errors
    ///
    /// Any [`MemoryBase::slice_mut`] failure for the range; nothing is written.
    pub fn memset(&mut self, address: u32, value: u32, length: i32) -> Result<()> {
        if length <= 0 {
            return Ok(());
        }
        let length = length as usize;
        trace!("memset 0x{:08X} = 0x{:02X} ({} bytes)", address, value & 0xFF, length);
        let (low, high) = span(address, length)?;
        self.backend.slice_mut(low, high)?.fill(value as u8);
        self.check_write_breakpoints(address, length);
        Ok(())
    }

    /// Stores `data` at `address` as one bulk write.
    ///
    /// # Errors
    ///
    /// Any [`MemoryBase::slice_mut`] failure for the range; nothing is written.
    pub fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let (low, high) = span(address, data.len())?;
        self.backend.slice_mut(low, high)?.copy_from_slice(data);
        self.check_write_breakpoints(address, data.len());
        Ok(())
    }

    /// Stores `data` one byte at a time through the backend, then scans once.
    ///
    /// Unlike [`write_bytes`](Self::write_bytes) the range may span segments.
    ///
    /// # Errors
    ///
    /// `Unmapped` at the first byte the backend cannot resolve. The bytes before it stay
    /// written and are scanned before the error is returned.
    pub fn write_u8_array(&mut self, address: u32, data: &[u8]) -> Result<()> {
        for (offset, &byte) in data.iter().enumerate() {
            if let Err(err) = self
                .backend
                .write_u8(address.wrapping_add(offset as u32), byte)
            {
                self.check_write_breakpoints(address, offset);
                return Err(err);
            }
        }
        self.check_write_breakpoints(address, data.len());
        Ok(())
    }

    /// Drains `reader` into guest memory at `address`, returning the bytes written.
    ///
    /// Every byte goes through the instrumented single-byte write; the whole written
    /// range is then scanned once more.
    ///
    /// # Errors
    ///
    /// Propagates reader failures as `Io` and backend failures unchanged; bytes
    /// written before the failure stay written.
    pub fn write_stream<R: Read>(&mut self, address: u32, reader: R) -> Result<usize> {
        let mut written = 0usize;
        for byte in BufReader::new(reader).bytes() {
            self.write_u8(address.wrapping_add(written as u32), byte?)?;
            written += 1;
        }
        self.check_write_breakpoints(address, written);
        Ok(written)
    }

    /// Reads a zero-terminated Latin-1 string; `Ok(None)` for the null pointer.
    ///
    /// # Errors
    ///
    /// See [`ops::read_stringz`].
    pub fn read_stringz(&self, address: u32) -> Result<Option<String>> {
        ops::read_stringz(self, address)
    }

    /// Content hash of `count` bytes at `address`.
    ///
    /// # Errors
    ///
    /// See [`ops::hash`].
    pub fn hash(&self, address: u32, count: u32) -> Result<i32> {
        ops::hash(self, address, count)
    }

    /// Hash of the aligned words in `count` bytes at `address_aligned`.
    ///
    /// # Errors
    ///
    /// See [`ops::hash_word_count`].
    pub fn hash_word_count(&self, address_aligned: u32, count: u32) -> Result<i32> {
        ops::hash_word_count(self, address_aligned, count)
    }

    /// Owned copy of `length` bytes at `address`.
    ///
    /// # Errors
    ///
    /// See [`ops::read_bytes`].
    pub fn read_bytes(&self, address: u32, length: usize) -> Result<Vec<u8>> {
        ops::read_bytes(self, address, length)
    }

    /// Copies between two host buffers.
    ///
    /// # Errors
    ///
    /// See [`ops::memory_copy`].
    pub fn memory_copy(
        source: &[u8],
        source_position: usize,
        destination: &mut [u8],
        destination_position: usize,
        length: usize,
    ) -> Result<()> {
        ops::memory_copy(
            source,
            source_position,
            destination,
            destination_position,
            length,
        )
    }

    /// Writes the 32 MiB main-memory window to `sink`, raw, with no header.
    ///
    /// # Errors
    ///
    /// `Io` if the sink fails.
    pub fn dump<W: Write>(&self, mut sink: W) -> Result<()> {
        let (low, high) = span(MAINMEM_BASE, DUMP_SIZE)?;
        sink.write_all(self.backend.slice(low, high)?)?;
        sink.flush()?;
        Ok(())
    }

    /// Dumps main memory to a host file and returns the path written.
    ///
    /// With `None`, writes to the configured `debug.dump_path`.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be created or written.
    pub fn dump_to_path(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map_or_else(|| self.dump_path.clone(), Path::to_path_buf);
        let file = File::create(&path)?;
        self.dump(BufWriter::new(file))?;
        debug!("Dumped main memory to {}", path.display());
        Ok(path)
    }

    /// A stream over `[low, high)`, with both bounds masked.
    ///
    /// Writes through the stream bypass write breakpoints.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for an inverted range, otherwise as for
    /// [`slice_with_size`](Self::slice_with_size).
    pub fn slice_with_bounds(&mut self, low: u32, high: u32) -> Result<MemoryStream<'_>> {
        let (start, length) = masked_range(low, high).ok_or(MemoryError::OutOfBounds {
            address: low,
            length: 0,
        })?;
        self.slice_with_size(start, length as u32)
    }

    /// A stream over `size` bytes at `address`.
    ///
    /// Writes through the stream bypass write breakpoints.
    ///
    /// # Errors
    ///
    /// Any [`MemoryBase::slice_mut`] failure for the range.
    pub fn slice_with_size(&mut self, address: u32, size: u32) -> Result<MemoryStream<'_>> {
        let (low, high) = span(address, size as usize)?;
        Ok(MemoryStream::new(self.backend.slice_mut(low, high)?))
    }
}
