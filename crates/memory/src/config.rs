//! Configuration for the guest address space.
//!
//! This module defines the configuration structures used to build an
//! [`AddressSpace`](crate::AddressSpace). It provides:
//! 1. **Defaults:** Baseline values for backend choice and debugging limits.
//! 2. **Structures:** Hierarchical config for memory and debug settings.
//! 3. **Enums:** The backend store variant.
//!
//! Configuration is supplied as JSON by the embedding emulator, or use `Config::default()`.

use serde::Deserialize;

use crate::common::constants::DEFAULT_DUMP_NAME;
use crate::common::error::Result;

/// Default configuration constants.
mod defaults {
    /// Maximum nesting of breakpoint dispatch when actions write to memory themselves.
    ///
    /// A write performed by an action re-enters the scan; past this depth the scan is
    /// skipped so a self-triggering action cannot recurse without bound.
    pub const MAX_BREAKPOINT_DEPTH: usize = 8;
}

/// Backend store implementation.
///
/// Both variants implement the same contract; the choice only affects host
/// allocation strategy and per-access cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BackendKind {
    /// One contiguous 256 MiB allocation covering the whole masked range.
    ///
    /// Fastest; every typed access is a single masked index. Requires the host to
    /// reserve the full range (lazily on Unix).
    #[default]
    #[serde(alias = "Fast")]
    Unified,
    /// Three independent allocations (scratchpad, video memory, main memory).
    ///
    /// Every access resolves its owning segment first; addresses outside all
    /// segments are unmapped.
    #[serde(alias = "Low")]
    Segmented,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use pspmem_core::config::{BackendKind, Config};
///
/// let json = r#"{
///     "memory": { "backend": "Segmented" },
///     "debug": { "max_breakpoint_depth": 2 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.backend, BackendKind::Segmented);
/// assert_eq!(config.debug.max_breakpoint_depth, 2);
/// assert_eq!(config.debug.dump_path, "memory.bin");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend store settings
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Breakpoint and export settings
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Config {
    /// Parses a configuration from JSON text; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// `Config` if the text is not valid JSON or a field has the wrong shape.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Backend store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryConfig {
    /// Which backend store to allocate
    #[serde(default)]
    pub backend: BackendKind,
}

/// Debugging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugConfig {
    /// Maximum nesting of breakpoint dispatch
    #[serde(default = "DebugConfig::default_max_breakpoint_depth")]
    pub max_breakpoint_depth: usize,

    /// Host path written by `dump_to_path` when no explicit path is given
    #[serde(default = "DebugConfig::default_dump_path")]
    pub dump_path: String,
}

impl DebugConfig {
    /// Returns the default maximum breakpoint dispatch depth.
    const fn default_max_breakpoint_depth() -> usize {
        defaults::MAX_BREAKPOINT_DEPTH
    }

    /// Returns the default dump file name.
    fn default_dump_path() -> String {
        DEFAULT_DUMP_NAME.to_string()
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            max_breakpoint_depth: defaults::MAX_BREAKPOINT_DEPTH,
            dump_path: DEFAULT_DUMP_NAME.to_string(),
        }
    }
}
