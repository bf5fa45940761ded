//! Memory technology registry.
//!
//! Timing tables for each part belong to the kernel; this registry only knows which
//! identifiers exist and whether the part is a DRAM controller (DRAM controllers are
//! told how many channels they share the address space with).

use crate::common::ConfigError;

/// A memory technology the kernel can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryTechnology {
    /// Identifier passed to the kernel.
    pub name: &'static str,
    /// Whether the controller models DRAM banks and channels.
    pub dram: bool,
}

impl MemoryTechnology {
    const fn dram(name: &'static str) -> Self {
        Self { name, dram: true }
    }
}

/// Every known technology identifier.
pub const TECHNOLOGIES: &[MemoryTechnology] = &[
    MemoryTechnology {
        name: "SimpleMemory",
        dram: false,
    },
    MemoryTechnology::dram("DDR3_1600_8x8"),
    MemoryTechnology::dram("DDR3_2133_8x8"),
    MemoryTechnology::dram("DDR4_2400_16x4"),
    MemoryTechnology::dram("DDR4_2400_8x8"),
    MemoryTechnology::dram("DDR4_2400_4x16"),
    MemoryTechnology::dram("LPDDR2_S4_1066_1x32"),
    MemoryTechnology::dram("LPDDR3_1600_1x32"),
    MemoryTechnology::dram("WideIO_200_1x128"),
    MemoryTechnology::dram("GDDR5_4000_2x32"),
    MemoryTechnology::dram("HBM_1000_4H_1x128"),
    MemoryTechnology::dram("HMC_2500_1x32"),
];

/// Looks up a technology by its exact identifier.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownMemoryTechnology`] if `name` is not registered.
pub fn lookup(name: &str) -> Result<&'static MemoryTechnology, ConfigError> {
    TECHNOLOGIES
        .iter()
        .find(|tech| tech.name == name)
        .ok_or_else(|| ConfigError::UnknownMemoryTechnology(name.to_string()))
}
