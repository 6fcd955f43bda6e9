//! Memory Access Widths.
//!
//! This module defines the widths of typed guest accesses. They are used for the following:
//! 1. **Offset Alignment:** Typed accessors index a buffer in units of their width, so the
//!    low bits of a byte offset are discarded exactly as a host typed-array index would.
//! 2. **Breakpoint Ranges:** A write of width `w` at `a` is checked against `[a, a + w)`.

/// Width of a typed guest access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access (integers and `f32`).
    Word,
}

impl AccessWidth {
    /// Number of bytes touched by an access of this width.
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Aligns a buffer offset down to this width.
    #[inline(always)]
    pub const fn align(self, offset: usize) -> usize {
        offset & !(self.bytes() - 1)
    }
}
