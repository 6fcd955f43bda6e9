//! Guest Buffer Implementation.
//!
//! This module provides a safe wrapper around the raw host allocation that backs guest
//! memory. It supports lazy allocation via `mmap` on Unix so the 256 MiB unified backend
//! only costs the pages the guest actually touches; other hosts fall back to a zeroed
//! heap allocation. The buffer is allocated once and never resized or moved.

use std::fmt;
use std::io;
use std::slice;

/// A fixed-size, zero-initialised block of host memory holding guest bytes.
///
/// Typed accessors are little-endian and take buffer-relative offsets that the caller
/// has already aligned and bounds-checked; they panic on an out-of-range offset, which
/// would indicate a resolution bug rather than a guest error.
pub struct GuestBuffer {
    ptr: *mut u8,
    size: usize,
    is_mmap: bool,
}

// SAFETY: the buffer exclusively owns its allocation; mutation requires `&mut self`.
unsafe impl Send for GuestBuffer {}
// SAFETY: shared references only permit reads.
unsafe impl Sync for GuestBuffer {}

impl GuestBuffer {
    /// Allocates a zeroed buffer of `size` bytes.
    ///
    /// On Unix, uses an anonymous private `mmap`; elsewhere, a boxed slice.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the mapping cannot be created.
    pub fn new(size: usize) -> io::Result<Self> {
        #[cfg(unix)]
        {
            use std::ptr;
            // SAFETY: anonymous mapping with no fixed address; the result is checked below.
            let ptr = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };

            if ptr == libc::MAP_FAILED {
                return Err(io::Error::last_os_error());
            }

            Ok(Self {
                ptr: ptr as *mut u8,
                size,
                is_mmap: true,
            })
        }

        #[cfg(not(unix))]
        {
            let boxed = vec![0u8; size].into_boxed_slice();
            let ptr = Box::into_raw(boxed) as *mut u8;
            Ok(Self {
                ptr,
                size,
                is_mmap: false,
            })
        }
    }

    /// Returns the size of the buffer in bytes.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` for a zero-sized buffer.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Views the whole buffer.
    #[inline(always)]
    pub const fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `size` initialised bytes for the lifetime of `self`.
        unsafe { slice::from_raw_parts(self.ptr, self.size) }
    }

    /// Views the whole buffer mutably.
    #[inline(always)]
    pub const fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr, self.size) }
    }

    /// Reads one byte.
    #[inline(always)]
    pub const fn read_u8(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Reads a little-endian half-word.
    #[inline(always)]
    pub fn read_u16(&self, offset: usize) -> u16 {
        let b = &self.as_slice()[offset..offset + 2];
        u16::from_le_bytes([b[0], b[1]])
    }

    /// Reads a little-endian word.
    #[inline(always)]
    pub fn read_u32(&self, offset: usize) -> u32 {
        let b = &self.as_slice()[offset..offset + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Writes one byte.
    #[inline(always)]
    pub const fn write_u8(&mut self, offset: usize, val: u8) {
        self.as_mut_slice()[offset] = val;
    }

    /// Writes a little-endian half-word.
    #[inline(always)]
    pub fn write_u16(&mut self, offset: usize, val: u16) {
        self.as_mut_slice()[offset..offset + 2].copy_from_slice(&val.to_le_bytes());
    }

    /// Writes a little-endian word.
    #[inline(always)]
    pub fn write_u32(&mut self, offset: usize, val: u32) {
        self.as_mut_slice()[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
    }
}

impl fmt::Debug for GuestBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuestBuffer")
            .field("size", &self.size)
            .field("is_mmap", &self.is_mmap)
            .finish()
    }
}

impl Drop for GuestBuffer {
    /// Unmaps the mapping on Unix; otherwise rebuilds and drops the boxed slice.
    fn drop(&mut self) {
        if self.is_mmap {
            #[cfg(unix)]
            // SAFETY: `ptr`/`size` came from a successful `mmap` and are unmapped once.
            unsafe {
                let _ = libc::munmap(self.ptr as *mut _, self.size);
            }
        } else {
            #[cfg(not(unix))]
            // SAFETY: `ptr`/`size` came from `Box::into_raw` on a boxed slice of this length.
            unsafe {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    self.ptr, self.size,
                )));
            }
        }
    }
}
