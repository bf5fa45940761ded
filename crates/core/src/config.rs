//! Configuration system for full-system runs.
//!
//! This module defines the configuration structures used to parameterize a machine
//! description. It provides:
//! 1. **Defaults:** Policy constants for the memory map, memory technology and debug port.
//! 2. **Structures:** `SystemConfig` (memory map, cache line, GDB) and `MemoryConfig`
//!    (technology identifier and channel count).
//!
//! The CLI always uses `Config::default()`; memory technology and channel count are
//! policy of this run configuration, not command-line options. A `Config` can also be
//! deserialized from JSON when embedding the resolver.

use serde::{Deserialize, Serialize};

/// Default configuration constants.
///
/// These values define the machine when not explicitly overridden in a JSON
/// configuration.
pub mod defaults {
    /// Base address of main system RAM (2 GiB).
    pub const RAM_BASE: u64 = 0x8000_0000;

    /// Total size of main system RAM (128 MiB).
    pub const RAM_SIZE: u64 = 128 * 1024 * 1024;

    /// System cache line size in bytes.
    ///
    /// Lower bound for the channel interleave granularity.
    pub const CACHE_LINE: u64 = 64;

    /// Memory technology used for every controller.
    pub const MEM_TYPE: &str = "DDR3_1600_8x8";

    /// Number of memory channels.
    pub const MEM_CHANNELS: usize = 1;

    /// TCP port the kernel listens on for a remote GDB connection.
    pub const GDB_PORT: u16 = 7000;

    /// Kernel ticks per simulated second (1 tick = 1 ps).
    pub const TICKS_PER_SECOND: u64 = 1_000_000_000_000;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rvfs_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.memory.technology, "DDR3_1600_8x8");
/// assert_eq!(config.memory.channels, 1);
/// ```
///
/// Deserializing from JSON with partial overrides:
///
/// ```
/// use rvfs_core::config::Config;
///
/// let json = r#"{
///     "system": { "ram_size": 268435456 },
///     "memory": { "channels": 2 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.system.ram_size, 256 * 1024 * 1024);
/// assert_eq!(config.system.ram_base, 0x8000_0000);
/// assert_eq!(config.memory.channels, 2);
/// assert_eq!(config.memory.technology, "DDR3_1600_8x8");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Memory map and debug settings
    #[serde(default)]
    pub system: SystemConfig,
    /// Main memory technology and channels
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// System memory map and debug configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemConfig {
    /// Main RAM base address
    #[serde(default = "SystemConfig::default_ram_base")]
    pub ram_base: u64,

    /// Main RAM size in bytes
    #[serde(default = "SystemConfig::default_ram_size")]
    pub ram_size: u64,

    /// Cache line size in bytes
    #[serde(default = "SystemConfig::default_cache_line")]
    pub cache_line_bytes: u64,

    /// Remote GDB port used when waiting for a debugger
    #[serde(default = "SystemConfig::default_gdb_port")]
    pub gdb_port: u16,
}

impl SystemConfig {
    fn default_ram_base() -> u64 {
        defaults::RAM_BASE
    }

    fn default_ram_size() -> u64 {
        defaults::RAM_SIZE
    }

    fn default_cache_line() -> u64 {
        defaults::CACHE_LINE
    }

    fn default_gdb_port() -> u16 {
        defaults::GDB_PORT
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
            cache_line_bytes: defaults::CACHE_LINE,
            gdb_port: defaults::GDB_PORT,
        }
    }
}

/// Main memory configuration.
///
/// Immutable once handed to the memory configurator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory technology identifier (e.g. `DDR3_1600_8x8`)
    #[serde(default = "MemoryConfig::default_technology")]
    pub technology: String,

    /// Number of memory channels
    #[serde(default = "MemoryConfig::default_channels")]
    pub channels: usize,
}

impl MemoryConfig {
    fn default_technology() -> String {
        defaults::MEM_TYPE.to_string()
    }

    fn default_channels() -> usize {
        defaults::MEM_CHANNELS
    }
}

impl Default for MemoryConfig {
    /// Creates the fixed memory policy: one `DDR3_1600_8x8` channel.
    fn default() -> Self {
        Self {
            technology: defaults::MEM_TYPE.to_string(),
            channels: defaults::MEM_CHANNELS,
        }
    }
}
