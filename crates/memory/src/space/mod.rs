//! Guest address space facade.
//!
//! This module defines [`AddressSpace`], the single owner of guest memory that the CPU,
//! GPU, and syscall layers talk to. It provides:
//! 1. **Backend Selection:** The backend store is chosen once from configuration.
//! 2. **Typed Access:** Reads forward to the backend; writes go through the instrumented
//!    write path so registered breakpoints observe them.
//! 3. **Address Policy:** The validity predicate and masked range test.
//! 4. **Notification:** Invalidation signals for downstream caches.
//!
//! Breakpoint registration lives in [`breakpoints`], bulk operations in [`ops`], and pointer
//! helpers in [`pointers`].

/// Write breakpoints and the instrumented write path.
pub mod breakpoints;

/// Bulk operations with single-scan breakpoint semantics.
pub mod ops;

/// Pointer, array, and stream helpers.
pub mod pointers;

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::backend::{Backend, MemoryBase};
use crate::common::addr;
use crate::common::data::AccessWidth;
use crate::common::error::{DebugTrap, Result};
use crate::config::{BackendKind, Config};
use crate::signal::{NumericRange, Signal};

pub use breakpoints::{BreakpointId, WriteAction, WritePath};

use breakpoints::WriteBreakpoint;

/// The emulated guest address space.
///
/// Owns the backend store, the write-breakpoint list, and the invalidation signals. There
/// is no global instance; construct one per emulated machine and pass it by reference.
///
/// # Examples
///
/// ```
/// use pspmem_core::{AddressSpace, MemoryBase};
///
/// let mut space = AddressSpace::segmented().unwrap();
/// space.write_u32(0x0880_0000, 0x1234_ABCD).unwrap();
/// assert_eq!(space.read_u16(0x0880_0002).unwrap(), 0x1234);
/// assert!(space.is_valid_address(0x4880_0000));
/// ```
pub struct AddressSpace {
    backend: Backend,
    breakpoints: Vec<WriteBreakpoint>,
    next_breakpoint_id: u64,
    write_path: WritePath,
    dispatch_depth: usize,
    max_dispatch_depth: usize,
    pending_traps: Vec<DebugTrap>,
    dump_path: PathBuf,
    /// Raised by callers after a range of guest data changed behind the CPU's back.
    pub invalidate_data_range: Signal<NumericRange>,
    /// Raised by callers after all guest data changed (e.g., a new module was loaded).
    pub invalidate_data_all: Signal<()>,
}

impl AddressSpace {
    /// Builds an address space with the backend selected by `config.memory.backend`.
    ///
    /// # Errors
    ///
    /// Fails if the host cannot allocate the backing buffers.
    pub fn new(config: &Config) -> Result<Self> {
        let backend = Backend::new(config.memory.backend)?;
        debug!("Address space backend: {:?}", backend.kind());
        Ok(Self {
            backend,
            breakpoints: Vec::new(),
            next_breakpoint_id: 0,
            write_path: WritePath::Direct,
            dispatch_depth: 0,
            max_dispatch_depth: config.debug.max_breakpoint_depth,
            pending_traps: Vec::new(),
            dump_path: PathBuf::from(&config.debug.dump_path),
            invalidate_data_range: Signal::new(),
            invalidate_data_all: Signal::new(),
        })
    }

    /// Address space over the unified backend with default settings.
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new).
    pub fn unified() -> Result<Self> {
        Self::with_backend(BackendKind::Unified)
    }

    /// Address space over the segmented backend with default settings.
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new).
    pub fn segmented() -> Result<Self> {
        Self::with_backend(BackendKind::Segmented)
    }

    fn with_backend(kind: BackendKind) -> Result<Self> {
        let mut config = Config::default();
        config.memory.backend = kind;
        Self::new(&config)
    }

    /// Which backend store is active.
    pub const fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Read-only access to the backend store.
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns `true` if `address` lies in a recognised guest region.
    pub const fn is_valid_address(&self, address: u32) -> bool {
        addr::is_valid_address(address)
    }

    /// Half-open range test `[min, max)` after masking all operands.
    pub const fn is_address_in_range(&self, address: u32, min: u32, max: u32) -> bool {
        addr::is_address_in_range(address, min, max)
    }

    /// Dispatches `range` to every `invalidate_data_range` subscriber.
    pub fn notify_invalidate_range(&mut self, range: NumericRange) {
        self.invalidate_data_range.dispatch(&range);
    }

    /// Dispatches to every `invalidate_data_all` subscriber.
    pub fn notify_invalidate_all(&mut self) {
        self.invalidate_data_all.dispatch(&());
    }

    /// Runs the breakpoint scan for a typed write if the instrumented path is selected.
    #[inline(always)]
    fn after_write(&mut self, address: u32, width: AccessWidth) {
        if self.write_path == WritePath::Instrumented {
            self.check_write_breakpoints(address, width.bytes());
        }
    }
}

impl MemoryBase for AddressSpace {
    #[inline(always)]
    fn read_u8(&self, address: u32) -> Result<u8> {
        self.backend.read_u8(address)
    }

    #[inline(always)]
    fn read_u16(&self, address: u32) -> Result<u16> {
        self.backend.read_u16(address)
    }

    #[inline(always)]
    fn read_u32(&self, address: u32) -> Result<u32> {
        self.backend.read_u32(address)
    }

    #[inline(always)]
    fn read_u32_word(&self, word_index: u32) -> Result<u32> {
        self.backend.read_u32_word(word_index)
    }

    #[inline(always)]
    fn write_u8(&mut self, address: u32, value: u8) -> Result<()> {
        self.backend.write_u8(address, value)?;
        self.after_write(address, AccessWidth::Byte);
        Ok(())
    }

    #[inline(always)]
    fn write_u16(&mut self, address: u32, value: u16) -> Result<()> {
        self.backend.write_u16(address, value)?;
        self.after_write(address, AccessWidth::Half);
        Ok(())
    }

    #[inline(always)]
    fn write_u32(&mut self, address: u32, value: u32) -> Result<()> {
        self.backend.write_u32(address, value)?;
        self.after_write(address, AccessWidth::Word);
        Ok(())
    }

    fn slice(&self, low: u32, high: u32) -> Result<&[u8]> {
        self.backend.slice(low, high)
    }

    fn slice_mut(&mut self, low: u32, high: u32) -> Result<&mut [u8]> {
        self.backend.slice_mut(low, high)
    }

    fn available_after_address(&self, address: u32) -> Result<usize> {
        self.backend.available_after_address(address)
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("backend", &self.backend)
            .field("breakpoints", &self.breakpoints)
            .field("write_path", &self.write_path)
            .field("pending_traps", &self.pending_traps)
            .field("invalidate_data_range", &self.invalidate_data_range)
            .field("invalidate_data_all", &self.invalidate_data_all)
            .finish_non_exhaustive()
    }
}
