//! Write breakpoints.
//!
//! A write breakpoint is an action bound to a guest address. After any write whose byte
//! range covers that address, the action runs synchronously on the writer's stack with
//! mutable access to the address space. It provides:
//! 1. **Path Selection:** With no breakpoints registered, writes skip the scan entirely.
//! 2. **Dispatch:** Matching actions run in registration order, once per matching entry.
//! 3. **Canned Actions:** Value watches and break-on-value conditions.
//! 4. **Debug Traps:** Conditions that hit are queued for the execution loop to drain.
//!
//! Actions may write memory. Nested writes re-enter the scan up to the configured depth.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::AddressSpace;
use crate::backend::MemoryBase;
use crate::common::addr::mask;
use crate::common::error::{DebugTrap, Result};

/// Callback run after a write covers its breakpoint address.
///
/// Receives the address space and the address the breakpoint was registered with
/// (unmasked).
pub type WriteAction = Arc<dyn Fn(&mut AddressSpace, u32) -> Result<()> + Send + Sync>;

/// Handle identifying a registered write breakpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreakpointId(u64);

/// Which write routine typed writes use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WritePath {
    /// Backend write only.
    #[default]
    Direct,
    /// Backend write followed by a breakpoint scan.
    Instrumented,
}

pub(super) struct WriteBreakpoint {
    id: BreakpointId,
    address: u32,
    action: WriteAction,
}

impl fmt::Debug for WriteBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteBreakpoint")
            .field("id", &self.id)
            .field("address", &format_args!("{:#010x}", self.address))
            .finish_non_exhaustive()
    }
}

impl AddressSpace {
    /// Registers `action` to run after any write covering `address`.
    ///
    /// Breakpoints are not deduplicated; registering the same address twice runs both
    /// actions, in registration order.
    pub fn add_write_action<F>(&mut self, address: u32, action: F) -> BreakpointId
    where
        F: Fn(&mut Self, u32) -> Result<()> + Send + Sync + 'static,
    {
        let id = BreakpointId(self.next_breakpoint_id);
        self.next_breakpoint_id += 1;
        self.breakpoints.push(WriteBreakpoint {
            id,
            address,
            action: Arc::new(action),
        });
        self.update_write_path();
        id
    }

    /// Logs the 32-bit value at `address` every time a write covers it.
    pub fn add_watch(&mut self, address: u32) -> BreakpointId {
        self.add_write_action(address, |space, address| {
            let value = space.read_u32(address)?;
            info!("Watch:0x{:08X} <- 0x{:08X}", address, value);
            Ok(())
        })
    }

    /// Queues a [`DebugTrap`] whenever a write leaves `value` at `address`.
    ///
    /// Every covering write logs the comparison; only a match queues a trap.
    pub fn add_breakpoint_on_value(&mut self, address: u32, value: u32) -> BreakpointId {
        self.add_write_action(address, move |space, _| {
            let actual = space.read_u32(address)?;
            debug!(
                "TryBreakpoint:0x{:08X} <- 0x{:08X} | 0x{:08X} ({})",
                address,
                actual,
                value,
                actual == value
            );
            if actual == value {
                space.pending_traps.push(DebugTrap {
                    address,
                    expected: value,
                    actual,
                });
            }
            Ok(())
        })
    }

    /// Unregisters a breakpoint. Returns `false` if `id` was not registered.
    pub fn remove_write_action(&mut self, id: BreakpointId) -> bool {
        let before = self.breakpoints.len();
        self.breakpoints.retain(|bp| bp.id != id);
        let removed = self.breakpoints.len() != before;
        self.update_write_path();
        removed
    }

    /// Unregisters every breakpoint.
    pub fn clear_write_actions(&mut self) {
        self.breakpoints.clear();
        self.update_write_path();
    }

    /// Number of registered breakpoints.
    pub const fn write_breakpoint_count(&self) -> usize {
        self.breakpoints.len()
    }

    /// The currently selected write path.
    pub const fn write_path(&self) -> WritePath {
        self.write_path
    }

    /// Drains the debug traps raised since the last call.
    pub fn take_debug_traps(&mut self) -> Vec<DebugTrap> {
        std::mem::take(&mut self.pending_traps)
    }

    const fn update_write_path(&mut self) {
        self.write_path = if self.breakpoints.is_empty() {
            WritePath::Direct
        } else {
            WritePath::Instrumented
        };
    }

    /// Runs every breakpoint whose masked address lies in `[start, start + length)`.
    ///
    /// Matching actions are collected before any of them runs, so actions registered or
    /// removed during dispatch only affect later writes.
    pub(crate) fn check_write_breakpoints(&mut self, start: u32, length: usize) {
        if self.breakpoints.is_empty() || length == 0 {
            return;
        }
        if self.dispatch_depth >= self.max_dispatch_depth {
            warn!(
                "Breakpoint dispatch depth {} reached at 0x{:08X}; scan skipped",
                self.dispatch_depth, start
            );
            return;
        }

        let start = u64::from(mask(start));
        let end = start + length as u64;
        let hits: Vec<(u32, WriteAction)> = self
            .breakpoints
            .iter()
            .filter(|bp| {
                let address = u64::from(mask(bp.address));
                address >= start && address < end
            })
            .map(|bp| (bp.address, Arc::clone(&bp.action)))
            .collect();

        let mut space = DispatchDepth::enter(self);
        for (address, action) in hits {
            if let Err(e) = action(&mut space, address) {
                error!("Write breakpoint at 0x{:08X} failed: {}", address, e);
            }
        }
    }
}

/// One level of breakpoint dispatch. The depth is released on drop, unwinding included.
struct DispatchDepth<'a> {
    space: &'a mut AddressSpace,
}

impl<'a> DispatchDepth<'a> {
    const fn enter(space: &'a mut AddressSpace) -> Self {
        space.dispatch_depth += 1;
        Self { space }
    }
}

impl Deref for DispatchDepth<'_> {
    type Target = AddressSpace;

    fn deref(&self) -> &AddressSpace {
        self.space
    }
}

impl DerefMut for DispatchDepth<'_> {
    fn deref_mut(&mut self) -> &mut AddressSpace {
        self.space
    }
}

impl Drop for DispatchDepth<'_> {
    fn drop(&mut self) {
        self.space.dispatch_depth -= 1;
    }
}
