//! Machine assembly.
//!
//! This module organizes everything needed to turn run options into a machine
//! description, including the resolver and the memory configurator it links against.

/// Resolver and machine description.
pub mod builder;

/// Memory technology registry and controller topology.
pub mod memory;

pub use builder::{CpuSpec, DebugSpec, MachineDescription, Resolver, RunOptions, resolve};
