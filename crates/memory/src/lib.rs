//! Guest address space library for a handheld-console emulator.
//!
//! This crate implements the emulated machine's memory with the following:
//! 1. **Backend:** Unified (one flat buffer) and segmented (scratchpad, video memory, main
//!    memory) stores behind one typed access contract.
//! 2. **Address Space:** The facade owning the backend, the validity policy, and the
//!    instrumented write path that drives write breakpoints.
//! 3. **Operations:** Copy, fill, bulk and stream writes, string reads, content hashing,
//!    and main-memory dumps.
//! 4. **Views:** Zero-copy byte and half-word views, cursor streams, and typed pointers.
//! 5. **Notification:** Invalidation signals for downstream caches.

/// Backend stores (buffer, contract, unified, segmented).
pub mod backend;
/// Common types and constants (address map, masking, access widths, errors).
pub mod common;
/// Address space configuration (defaults, backend choice, debug settings).
pub mod config;
/// Derived operations generic over the access contract (hash, strings, copies).
pub mod ops;
/// Subscriber lists for invalidation notices.
pub mod signal;
/// The address space facade (breakpoints, bulk operations, pointer helpers).
pub mod space;
/// Streams, half-word views, and typed pointers.
pub mod view;

/// Typed access contract; import it to call `read_*`/`write_*` on an address space.
pub use crate::backend::MemoryBase;
/// Error type and result alias shared by every operation.
pub use crate::common::error::{MemoryError, Result};
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The guest address space; construct with `AddressSpace::new`.
pub use crate::space::AddressSpace;
