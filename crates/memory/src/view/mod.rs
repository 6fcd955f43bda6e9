//! Views over guest memory.
//!
//! This module holds the borrowed handles that the pointer helpers hand out. It provides:
//! 1. **Streams:** A cursor for decoding and encoding sequential little-endian fields.
//! 2. **Half-Word Views:** Zero-copy `u16` access over a byte range.
//! 3. **Typed Pointers:** A guest address bound to a type that knows its own layout.

/// Typed guest pointers.
pub mod pointer;

/// Cursor streams.
pub mod stream;

/// Half-word views.
pub mod words;

pub use pointer::{GuestType, Pointer};
pub use stream::MemoryStream;
pub use words::WordView;
