//! Cursor streams over guest bytes.
//!
//! `MemoryStream` borrows a window of guest memory mutably and walks it with a cursor,
//! decoding and encoding little-endian primitives as it goes. The syscall layer uses it to
//! parse argument structures and fill output buffers. A stream can also be the invalid
//! sentinel returned when a pointer fails validation; every access on it fails.

use crate::common::error::{MemoryError, Result};
use crate::ops::latin1;

/// A read/write cursor over a borrowed window of guest bytes.
///
/// Writes go straight into guest memory and do not fire write breakpoints.
#[derive(Debug, Default)]
pub struct MemoryStream<'a> {
    data: &'a mut [u8],
    position: usize,
    invalid: bool,
}

macro_rules! stream_primitive {
    ($read:ident, $write:ident, $ty:ty) => {
        #[doc = concat!("Reads a little-endian `", stringify!($ty), "` and advances.")]
        ///
        /// # Errors
        ///
        /// `InvalidStream` on the sentinel, `StreamOverrun` if too few bytes remain.
        pub fn $read(&mut self) -> Result<$ty> {
            let mut raw = [0u8; size_of::<$ty>()];
            raw.copy_from_slice(self.take(size_of::<$ty>())?);
            Ok(<$ty>::from_le_bytes(raw))
        }

        #[doc = concat!("Writes a little-endian `", stringify!($ty), "` and advances.")]
        ///
        /// # Errors
        ///
        /// `InvalidStream` on the sentinel, `StreamOverrun` if too few bytes remain.
        pub fn $write(&mut self, value: $ty) -> Result<()> {
            self.take(size_of::<$ty>())?
                .copy_from_slice(&value.to_le_bytes());
            Ok(())
        }
    };
}

impl<'a> MemoryStream<'a> {
    /// Wraps `data` with the cursor at 0.
    pub const fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            position: 0,
            invalid: false,
        }
    }

    /// A valid stream with no bytes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The sentinel returned for rejected pointers.
    pub fn invalid() -> Self {
        Self {
            invalid: true,
            ..Self::default()
        }
    }

    /// Returns `false` for the invalid sentinel.
    pub const fn is_valid(&self) -> bool {
        !self.invalid
    }

    /// Cursor position in bytes from the start of the window.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`.
    ///
    /// # Errors
    ///
    /// `StreamOverrun` if `position` lies past the end of the window.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        self.check()?;
        if position > self.data.len() {
            return Err(self.overrun(position.saturating_sub(self.position)));
        }
        self.position = position;
        Ok(())
    }

    /// Total window length.
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the window has no bytes.
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes between the cursor and the end of the window.
    pub const fn available(&self) -> usize {
        self.data.len() - self.position
    }

    /// Views the whole window.
    pub const fn as_slice(&self) -> &[u8] {
        self.data
    }

    #[inline]
    const fn check(&self) -> Result<()> {
        if self.invalid {
            return Err(MemoryError::InvalidStream);
        }
        Ok(())
    }

    #[cold]
    const fn overrun(&self, requested: usize) -> MemoryError {
        MemoryError::StreamOverrun {
            position: self.position,
            requested,
            length: self.data.len(),
        }
    }

    /// Claims the next `count` bytes and advances past them.
    fn take(&mut self, count: usize) -> Result<&mut [u8]> {
        self.check()?;
        if count > self.available() {
            return Err(self.overrun(count));
        }
        let start = self.position;
        self.position += count;
        Ok(&mut self.data[start..start + count])
    }

    /// Reads an unsigned byte and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than one byte remain.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a signed byte and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than one byte remain.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Writes a byte and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than one byte remain.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.take(1)?[0] = value;
        Ok(())
    }

    /// Writes a signed byte and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than one byte remain.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    stream_primitive!(read_u16, write_u16, u16);
    stream_primitive!(read_i16, write_i16, i16);
    stream_primitive!(read_u32, write_u32, u32);
    stream_primitive!(read_i32, write_i32, i32);
    stream_primitive!(read_f32, write_f32, f32);

    /// Reads `count` raw bytes and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        Ok(self.take(count)?)
    }

    /// Writes `bytes` and advances.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than `bytes.len()` bytes remain.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.take(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads a fixed-size field of `count` bytes, keeping the text before the first zero.
    ///
    /// The cursor always advances by `count`.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than `count` bytes remain.
    pub fn read_string(&mut self, count: usize) -> Result<String> {
        let bytes = self.take(count)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(latin1(&bytes[..end]))
    }

    /// Reads a zero-terminated string and advances past the terminator.
    ///
    /// # Errors
    ///
    /// `StreamOverrun` if the window ends before a terminator.
    pub fn read_stringz(&mut self) -> Result<String> {
        self.check()?;
        let rest = &self.data[self.position..];
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            return Err(self.overrun(rest.len() + 1));
        };
        let text = latin1(&rest[..end]);
        self.position += end + 1;
        Ok(text)
    }

    /// Advances the cursor by `count` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if fewer than `count` bytes remain.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let _ = self.take(count)?;
        Ok(())
    }

    /// A sub-stream over `[start, start + length)` of this window, cursor at 0.
    ///
    /// The parent cursor does not move.
    ///
    /// # Errors
    ///
    /// `InvalidStream` on the sentinel, `StreamOverrun` if the range leaves the window.
    pub fn slice_with_length(&mut self, start: usize, length: usize) -> Result<MemoryStream<'_>> {
        self.check()?;
        let end = start.checked_add(length).filter(|&end| end <= self.data.len());
        let Some(end) = end else {
            return Err(MemoryError::StreamOverrun {
                position: start,
                requested: length,
                length: self.data.len(),
            });
        };
        Ok(MemoryStream::new(&mut self.data[start..end]))
    }
}
