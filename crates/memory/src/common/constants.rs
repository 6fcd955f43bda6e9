//! Guest Address Map Constants.
//!
//! This module defines the fixed address map of the emulated console. It includes:
//! 1. **Masking:** The 28-bit significance mask applied to every guest address.
//! 2. **Physical Regions:** Base and size of the scratchpad, video memory, and main memory.
//! 3. **Windows:** The default frame buffer and the main-memory window used by `dump`.
//! 4. **Validity Patterns:** The bit patterns that recognise mirrored region aliases.
//!
//! These values must match the console exactly; guest software hard-codes them.

/// Only the low 28 bits of a guest address are significant.
pub const ADDRESS_MASK: u32 = 0x0FFFFFFF;

/// Size in bytes of the unified backing buffer (`ADDRESS_MASK + 1`, 256 MiB).
pub const UNIFIED_SIZE: usize = ADDRESS_MASK as usize + 1;

/// Base address of the 16 KiB scratchpad.
pub const SCRATCHPAD_BASE: u32 = 0x00010000;

/// Size of the scratchpad in bytes.
pub const SCRATCHPAD_SIZE: usize = 16 * 1024;

/// Base address of video memory.
pub const VIDEOMEM_BASE: u32 = 0x04000000;

/// Size of video memory in bytes (2 MiB).
pub const VIDEOMEM_SIZE: usize = 2 * 1024 * 1024;

/// Base address of main memory.
pub const MAINMEM_BASE: u32 = 0x08000000;

/// Size of main memory in bytes (32 MiB).
pub const MAINMEM_SIZE: usize = 32 * 1024 * 1024;

/// Address of the default frame buffer the firmware scans out of video memory.
pub const DEFAULT_FRAME_ADDRESS: u32 = 0x04000000;

/// Size of the default frame buffer window (2 MiB).
pub const DEFAULT_FRAME_SIZE: u32 = 0x200000;

/// End (exclusive) of the widest main-memory window accepted as valid (64 MiB).
pub const MAINMEM_WINDOW_END: u32 = MAINMEM_BASE + 0x04000000;

/// Number of bytes written by a memory dump (the primary RAM window).
pub const DUMP_SIZE: usize = 0x2000000;

/// Main-memory mirror pattern: `(addr & MAINMEM_MIRROR_MASK) == MAINMEM_BASE`.
pub const MAINMEM_MIRROR_MASK: u32 = 0x3E000000;

/// Video-memory mirror pattern: `(addr & VIDEOMEM_MIRROR_MASK) == VIDEOMEM_BASE`.
pub const VIDEOMEM_MIRROR_MASK: u32 = 0x3F800000;

/// Scratchpad alias pattern: `(addr & SCRATCHPAD_ALIAS_MASK) == SCRATCHPAD_BASE`.
pub const SCRATCHPAD_ALIAS_MASK: u32 = 0xBFFF0000;

/// Default name of the file written by [`AddressSpace::dump_to_path`](crate::AddressSpace::dump_to_path).
pub const DEFAULT_DUMP_NAME: &str = "memory.bin";

/// Multiplier applied to trailing unaligned bytes by the content hash.
pub const HASH_TAIL_WEIGHT: i32 = 7;
