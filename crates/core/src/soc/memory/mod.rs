//! Main memory configuration.
//!
//! This module provides:
//! 1. **Technology registry:** Known memory technology identifiers and whether they are DRAM parts.
//! 2. **Topology:** One controller per channel with interleaved address ranges.

/// Memory technology registry.
pub mod technology;

/// Per-channel controller topology and interleaved address ranges.
pub mod topology;

pub use technology::MemoryTechnology;
pub use topology::{AddrRange, MemoryControllerSpec, MemoryTopology, configure};
