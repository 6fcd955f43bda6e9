//! Common utilities and types used throughout the guest memory crate.
//!
//! This module provides the building blocks shared by every layer. It includes:
//! 1. **Constants:** The fixed guest address map.
//! 2. **Address Helpers:** Masking, range tests, and the validity predicate.
//! 3. **Access Widths:** Typed access sizes and their offset alignment.
//! 4. **Error Handling:** The memory error taxonomy and debug trap records.

/// Address masking, range, and validity helpers.
pub mod addr;

/// Fixed guest address map constants.
pub mod constants;

/// Typed access width definitions.
pub mod data;

/// Error types and debug trap definitions.
pub mod error;

pub use addr::{is_address_in_range, is_null, is_valid_address, mask};
pub use constants::ADDRESS_MASK;
pub use data::AccessWidth;
pub use error::{DebugTrap, MemoryError, Result};
