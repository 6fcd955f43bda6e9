//! Pointer helpers.
//!
//! Turning a guest pointer into something the host can read is the syscall layer's most
//! common operation. The helpers here come in two flavours: the `get_pointer_*` family
//! trusts the address and reports backend failures as errors, while `get_u8_array`,
//! `get_u16_array`, and `get_pointer_stream` apply the validity policy first and turn every
//! failure into `None` or the invalid stream.
//!
//! All views are zero-copy. Writes through a mutable view bypass write breakpoints.

use super::AddressSpace;
use crate::backend::MemoryBase;
use crate::common::addr::{is_null, is_valid_address, mask};
use crate::common::error::Result;
use crate::ops::span;
use crate::view::{GuestType, MemoryStream, Pointer, WordView};

impl AddressSpace {
    /// Resolves an optional size; `None` and `Some(0)` mean "to the end of the buffer".
    fn resolve_span(&self, address: u32, size: Option<u32>) -> Result<(u32, u32)> {
        let size = match size {
            None | Some(0) => self.backend.available_after_address(address)?,
            Some(size) => size as usize,
        };
        span(address, size)
    }

    /// Byte view of `size` bytes at `address`.
    ///
    /// # Errors
    ///
    /// `Unmapped` if the backend cannot resolve `address`, otherwise any
    /// [`MemoryBase::slice`] failure for the range.
    pub fn get_pointer_u8_array(&self, address: u32, size: Option<u32>) -> Result<&[u8]> {
        let (low, high) = self.resolve_span(address, size)?;
        self.backend.slice(low, high)
    }

    /// Mutable byte view of `size` bytes at `address`.
    ///
    /// # Errors
    ///
    /// `Unmapped` if the backend cannot resolve `address`, otherwise any
    /// [`MemoryBase::slice`] failure for the range.
    pub fn get_pointer_u8_array_mut(
        &mut self,
        address: u32,
        size: Option<u32>,
    ) -> Result<&mut [u8]> {
        let (low, high) = self.resolve_span(address, size)?;
        self.backend.slice_mut(low, high)
    }

    /// Half-word view over `size` bytes at `address`.
    ///
    /// # Errors
    ///
    /// As for [`get_pointer_u8_array`](Self::get_pointer_u8_array).
    pub fn get_pointer_u16_array(
        &self,
        address: u32,
        size: Option<u32>,
    ) -> Result<WordView<&[u8]>> {
        Ok(WordView::new(self.get_pointer_u8_array(address, size)?))
    }

    /// Mutable half-word view over `size` bytes at `address`.
    ///
    /// # Errors
    ///
    /// As for [`get_pointer_u8_array`](Self::get_pointer_u8_array).
    pub fn get_pointer_u16_array_mut(
        &mut self,
        address: u32,
        size: Option<u32>,
    ) -> Result<WordView<&mut [u8]>> {
        Ok(WordView::new(self.get_pointer_u8_array_mut(address, size)?))
    }

    /// A stream over guest memory for syscall argument parsing.
    ///
    /// * `Some(0)` yields a valid empty stream.
    /// * The null pointer, an address outside every recognised region, a negative size,
    ///   or a range the backend cannot resolve yields [`MemoryStream::invalid`].
    /// * `None` extends the stream to the end of the owning buffer.
    pub fn get_pointer_stream(&mut self, address: u32, size: Option<i32>) -> MemoryStream<'_> {
        if is_null(address) {
            return MemoryStream::invalid();
        }
        if size == Some(0) {
            return MemoryStream::empty();
        }
        if !is_valid_address(address) {
            return MemoryStream::invalid();
        }
        let address = mask(address);
        let size = match size {
            Some(size) if size < 0 => return MemoryStream::invalid(),
            Some(size) => size as usize,
            None => match self.backend.available_after_address(address) {
                Ok(available) => available,
                Err(_) => return MemoryStream::invalid(),
            },
        };
        let Ok((low, high)) = span(address, size) else {
            return MemoryStream::invalid();
        };
        self.backend
            .slice_mut(low, high)
            .map_or_else(|_| MemoryStream::invalid(), MemoryStream::new)
    }

    /// Byte view for a guest pointer, or `None` if it is null, invalid, or unresolvable.
    pub fn get_u8_array(&self, address: u32, size: Option<u32>) -> Option<&[u8]> {
        if is_null(address) || !is_valid_address(address) {
            return None;
        }
        self.get_pointer_u8_array(mask(address), size).ok()
    }

    /// Half-word view for a guest pointer, or `None` if it is null, invalid, or
    /// unresolvable.
    pub fn get_u16_array(&self, address: u32, size: Option<u32>) -> Option<WordView<&[u8]>> {
        self.get_u8_array(address, size).map(WordView::new)
    }

    /// Typed handle on `address`, or `None` for the null pointer.
    pub fn get_pointer_pointer<T: GuestType>(&mut self, address: u32) -> Option<Pointer<'_, T>> {
        if is_null(address) {
            return None;
        }
        Some(Pointer::new(self, address))
    }
}
