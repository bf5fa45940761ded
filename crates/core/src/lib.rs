//! Full-system RISC-V run configuration library.
//!
//! This crate assembles and drives a full-system simulation run with the following:
//! 1. **CPU:** Closed set of CPU timing models and the memory mode each one requires.
//! 2. **Memory:** Technology registry and per-channel controller topology with address interleaving.
//! 3. **SoC:** Resolver that turns run options into a mode-consistent `MachineDescription`.
//! 4. **Simulation:** Kernel traits, the run controller state machine, and an external process kernel.
//!
//! The simulation kernel itself is an external collaborator reached through [`sim::Kernel`].

/// Common types (error enums).
pub mod common;
/// Run configuration (policy defaults, system and memory settings).
pub mod config;
/// CPU timing models and memory access modes.
pub mod cpu;
/// Kernel interface, run controller, boot image probe and process kernel.
pub mod sim;
/// Machine assembly (resolver, machine description, memory topology).
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// CPU model selection and its memory mode.
pub use crate::cpu::{CpuModel, MemoryMode};
/// Run controller and its report.
pub use crate::sim::{RunController, RunState, TerminationReport};
/// Resolved machine and the resolver entry points.
pub use crate::soc::{MachineDescription, Resolver, RunOptions, resolve};
