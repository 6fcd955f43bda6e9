//! Memory errors and debug traps.
//!
//! This module defines the failure taxonomy of the guest address space. It provides:
//! 1. **Resolution Failures:** Unmapped addresses, segment-crossing ranges, and ranges that
//!    run past the end of their backing buffer.
//! 2. **Derived Failures:** Unterminated strings, invalid or overrun streams, host buffer
//!    misuse, and I/O errors from dump sinks and stream sources.
//! 3. **Debug Traps:** The record pushed by a conditional write breakpoint when its
//!    target value is observed.

use std::io;

use thiserror::Error;

/// Errors reported by the guest address space and its views.
///
/// The syscall layer translates these into guest-visible error codes; they never
/// reach guest code directly.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// No backing region contains the address.
    #[error("unmapped guest address {address:#010x}")]
    Unmapped {
        /// The (unmasked) address that failed to resolve.
        address: u32,
    },

    /// A slice request spans two backing segments.
    #[error("range {low:#010x}..{high:#010x} crosses a segment boundary")]
    SegmentCrossing {
        /// Inclusive lower bound as requested.
        low: u32,
        /// Exclusive upper bound as requested.
        high: u32,
    },

    /// A range runs past the end of its backing buffer, or ends before it starts.
    #[error("range at {address:#010x} of {length} bytes is out of bounds")]
    OutOfBounds {
        /// Start of the offending range.
        address: u32,
        /// Requested length in bytes.
        length: usize,
    },

    /// No zero terminator before the end of the owning buffer.
    #[error("string at {address:#010x} has no terminator")]
    UnterminatedString {
        /// Address the read started at.
        address: u32,
    },

    /// An operation was attempted on the invalid stream sentinel.
    #[error("invalid stream")]
    InvalidStream,

    /// A stream read or write ran past the end of its window.
    #[error("stream overrun: {requested} bytes at position {position} of {length}")]
    StreamOverrun {
        /// Cursor position when the access was attempted.
        position: usize,
        /// Bytes the access needed.
        requested: usize,
        /// Total length of the stream window.
        length: usize,
    },

    /// A host-to-host copy addressed bytes outside one of its buffers.
    #[error("host buffer copy of {length} bytes out of bounds (source {source_len}, destination {destination_len})")]
    HostBuffer {
        /// Requested copy length.
        length: usize,
        /// Length of the source buffer.
        source_len: usize,
        /// Length of the destination buffer.
        destination_len: usize,
    },

    /// A breakpoint action reported a failure of its own.
    #[error("breakpoint action failed: {0}")]
    Breakpoint(String),

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A dump sink or stream source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// A debugger trap raised by a conditional write breakpoint.
///
/// Pushed onto the address space's pending-trap queue when the value observed
/// after a write equals the breakpoint's target. The execution loop drains the
/// queue with [`AddressSpace::take_debug_traps`](crate::AddressSpace::take_debug_traps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugTrap {
    /// Address the breakpoint was registered on.
    pub address: u32,
    /// Value the breakpoint was waiting for.
    pub expected: u32,
    /// Value read back after the write.
    pub actual: u32,
}

impl std::fmt::Display for DebugTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DebugTrap({:#010x} == {:#010x})",
            self.address, self.actual
        )
    }
}
