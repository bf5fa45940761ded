//! Configuration and run-control error definitions.
//!
//! This module defines the error taxonomy of a run. It provides:
//! 1. **`ConfigError`:** Deterministic rejections raised while resolving a machine description.
//! 2. **`SimError`:** Failures raised while handing a description to the kernel, plus
//!    out-of-order use of the run controller.
//!
//! Nothing that happens after the kernel starts simulating is an error here; every
//! ending of a run is reported as a [`TerminationReport`](crate::sim::TerminationReport).

use thiserror::Error;

use crate::cpu::MemoryMode;
use crate::sim::RunState;

/// Errors raised while resolving run options into a machine description.
///
/// All of these are deterministic functions of the inputs, so retrying with the same
/// options reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The requested CPU model is not one of `atomic`, `timing`, `minor`.
    #[error("unsupported CPU model '{0}' (expected one of: atomic, timing, minor)")]
    UnsupportedCpuModel(String),

    /// No boot binary path was given, or the path is empty.
    #[error("a boot binary is required (-b/--binary)")]
    MissingBootBinary,

    /// The memory technology identifier is not in the registry.
    #[error("unknown memory technology '{0}'")]
    UnknownMemoryTechnology(String),

    /// The memory channel count is zero.
    #[error("memory channel count must be positive")]
    ZeroMemoryChannels,

    /// The memory channel count cannot be expressed as interleave bits.
    #[error("number of memory channels must be a power of 2, got {0}")]
    NonPowerOfTwoChannels(usize),

    /// Not every channel would receive at least one interleave block of RAM.
    #[error("{channels} memory channels need more than the {ram_size:#x} bytes of RAM")]
    ChannelsExceedMemory {
        /// Requested channel count.
        channels: usize,
        /// RAM size in bytes.
        ram_size: u64,
    },

    /// The CPU class does not implement the CPU model it is recorded for.
    #[error("CPU class mismatch: model {model} is {expected}, description says {found}")]
    CpuClassMismatch {
        /// CPU model name.
        model: String,
        /// Class implementing the model.
        expected: String,
        /// Class recorded in the description.
        found: String,
    },

    /// The controller topology does not match the memory configuration.
    #[error("memory topology mismatch: {0}")]
    MemoryTopologyMismatch(String),

    /// A machine description without any memory controllers.
    #[error("machine description has no memory controllers")]
    EmptyMemoryTopology,

    /// A component disagrees with the machine-wide memory mode.
    #[error("memory mode mismatch: {component} uses {found}, machine uses {expected}")]
    MemoryModeMismatch {
        /// Component that disagrees (e.g. `cpu` or `mem_ctrls[1]`).
        component: String,
        /// Machine-wide memory mode.
        expected: MemoryMode,
        /// Mode recorded on the component.
        found: MemoryMode,
    },
}

/// Errors raised by the run controller and kernel implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The description could not be resolved or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The kernel rejected the assembled configuration; the message is the kernel's own.
    #[error("instantiation failed: {0}")]
    InstantiationFailure(String),

    /// A run-controller stage was invoked out of order.
    #[error("invalid run state transition {from} -> {to}")]
    InvalidTransition {
        /// State the controller was in.
        from: RunState,
        /// State the caller tried to enter.
        to: RunState,
    },
}
