//! Memory controller topology.
//!
//! Builds one controller per channel for every memory range. With more than one
//! channel, consecutive interleave blocks of a range are spread across the
//! controllers, and the channel-select bits are XOR-hashed with higher address bits
//! so that strided access patterns do not pile onto one channel.
//!
//! The interleave granularity is the larger of 128 bytes and the cache line size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::ConfigError;
use crate::config::{MemoryConfig, SystemConfig};
use crate::cpu::MemoryMode;
use crate::soc::memory::technology;

/// Smallest interleave block in bytes.
const MIN_INTERLEAVE_BYTES: u64 = 128;

/// Lowest address bit folded into the channel-select hash.
const XOR_LOW_BIT: u8 = 20;

/// Physical address range, optionally interleaved across channels.
///
/// An interleaved range only claims the addresses whose channel-select bits
/// (`intlv_high_bit` down, `intlv_bits` wide) XOR the hash bits (`xor_high_bit` down,
/// same width) equal `intlv_match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddrRange {
    /// First address of the range.
    pub start: u64,
    /// Size of the range in bytes.
    pub size: u64,
    /// Highest channel-select bit.
    pub intlv_high_bit: u8,
    /// Highest hash bit; zero disables hashing.
    pub xor_high_bit: u8,
    /// Number of channel-select bits; zero means not interleaved.
    pub intlv_bits: u8,
    /// Channel-select value this range accepts.
    pub intlv_match: u64,
}

impl AddrRange {
    /// Creates a contiguous, non-interleaved range.
    pub const fn new(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            intlv_high_bit: 0,
            xor_high_bit: 0,
            intlv_bits: 0,
            intlv_match: 0,
        }
    }

    /// Returns true if the range is split across channels.
    pub const fn interleaved(&self) -> bool {
        self.intlv_bits != 0
    }

    /// Returns true if channel selection is XOR-hashed.
    pub const fn hashed(&self) -> bool {
        self.interleaved() && self.xor_high_bit != 0
    }

    /// Size of one interleave block in bytes (the whole range when not interleaved).
    pub fn granularity(&self) -> u64 {
        if self.interleaved() {
            1u64.checked_shl(self.select_shift(self.intlv_high_bit)).unwrap_or(0)
        } else {
            self.size
        }
    }

    /// Returns true if `addr` falls inside the range and selects this channel.
    pub fn contains(&self, addr: u64) -> bool {
        if addr < self.start || addr - self.start >= self.size {
            return false;
        }
        if !self.interleaved() {
            return true;
        }

        let mask = 1u64
            .checked_shl(u32::from(self.intlv_bits))
            .map_or(u64::MAX, |bit| bit - 1);
        let field = |high_bit: u8| {
            addr.checked_shr(self.select_shift(high_bit)).unwrap_or(0) & mask
        };

        let mut select = field(self.intlv_high_bit);
        if self.hashed() {
            select ^= field(self.xor_high_bit);
        }
        select == self.intlv_match
    }

    /// Lowest bit of an `intlv_bits`-wide field ending at `high_bit`.
    fn select_shift(&self, high_bit: u8) -> u32 {
        (u32::from(high_bit) + 1).saturating_sub(u32::from(self.intlv_bits))
    }
}

/// One memory controller of the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryControllerSpec {
    /// Memory technology identifier.
    pub technology: String,
    /// Channel index within its memory range.
    pub channel: usize,
    /// Total channel count, only set for DRAM controllers.
    pub channels: Option<usize>,
    /// Addresses served by this controller.
    pub range: AddrRange,
    /// Memory mode the controller must run in.
    pub mem_mode: MemoryMode,
}

/// Ordered set of memory controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTopology {
    controllers: Vec<MemoryControllerSpec>,
}

impl MemoryTopology {
    /// All controllers, ordered by range then channel.
    pub fn controllers(&self) -> &[MemoryControllerSpec] {
        &self.controllers
    }

    /// Number of controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns true if the topology has no controllers.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Controller that serves `addr`, if any.
    pub fn controller_for(&self, addr: u64) -> Option<&MemoryControllerSpec> {
        self.controllers.iter().find(|ctrl| ctrl.range.contains(addr))
    }
}

/// Builds the controller topology for the machine's memory.
///
/// Every controller is created in `mem_mode`.
///
/// # Errors
///
/// Fails if the technology is unknown, the channel count is zero or not a power
/// of two, or RAM is too small to give every channel one interleave block.
pub fn configure(
    memory: &MemoryConfig,
    system: &SystemConfig,
    mem_mode: MemoryMode,
) -> Result<MemoryTopology, ConfigError> {
    let tech = technology::lookup(&memory.technology)?;

    let channels = memory.channels;
    if channels == 0 {
        return Err(ConfigError::ZeroMemoryChannels);
    }
    if !channels.is_power_of_two() {
        return Err(ConfigError::NonPowerOfTwoChannels(channels));
    }

    let intlv_size = system.cache_line_bytes.max(MIN_INTERLEAVE_BYTES);
    let fits = u64::try_from(channels)
        .ok()
        .and_then(|n| n.checked_mul(intlv_size))
        .is_some_and(|needed| needed <= system.ram_size);
    if !fits {
        return Err(ConfigError::ChannelsExceedMemory {
            channels,
            ram_size: system.ram_size,
        });
    }

    let intlv_low_bit = intlv_size.ilog2() as u8;
    let intlv_bits = channels.ilog2() as u8;
    let intlv_high_bit = intlv_low_bit + intlv_bits - 1;
    let xor_high_bit = XOR_LOW_BIT + intlv_bits - 1;

    let mem_ranges = [AddrRange::new(system.ram_base, system.ram_size)];

    let mut controllers = Vec::with_capacity(mem_ranges.len() * channels);
    for range in &mem_ranges {
        for channel in 0..channels {
            controllers.push(MemoryControllerSpec {
                technology: tech.name.to_string(),
                channel,
                channels: tech.dram.then_some(channels),
                range: AddrRange {
                    intlv_high_bit,
                    xor_high_bit,
                    intlv_bits,
                    intlv_match: channel as u64,
                    ..*range
                },
                mem_mode,
            });
        }
    }

    debug!(
        technology = tech.name,
        channels,
        intlv_size,
        %mem_mode,
        "configured memory controllers"
    );

    Ok(MemoryTopology { controllers })
}
