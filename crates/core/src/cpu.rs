//! CPU timing models and the memory access mode each one requires.
//!
//! The set of CPU models is closed. Each model maps through an exhaustive table to the
//! kernel class that implements it and to the `MemoryMode` the rest of the machine must
//! use, so a new model cannot be added without deciding its mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Protocol used by simulated components to exchange memory requests.
///
/// Must be uniform across a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryMode {
    /// Requests complete immediately with an estimated latency.
    Atomic,
    /// Requests and responses are separate timed events.
    Timing,
}

impl MemoryMode {
    /// Lowercase name as used by the kernel.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Timing => "timing",
        }
    }
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU execution-timing model.
///
/// # Examples
///
/// ```
/// use rvfs_core::cpu::{CpuModel, MemoryMode};
///
/// let cpu: CpuModel = "minor".parse().unwrap();
/// assert_eq!(cpu.class_name(), "MinorCPU");
/// assert_eq!(cpu.memory_mode(), MemoryMode::Timing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuModel {
    /// Functional-only simple CPU.
    #[default]
    Atomic,
    /// Simple CPU with timed memory accesses.
    Timing,
    /// Four-stage in-order pipelined CPU.
    Minor,
}

impl CpuModel {
    /// Every supported model, in command-line order.
    pub const ALL: [Self; 3] = [Self::Atomic, Self::Timing, Self::Minor];

    /// Name accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Timing => "timing",
            Self::Minor => "minor",
        }
    }

    /// Kernel class implementing this model.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Atomic => "AtomicSimpleCPU",
            Self::Timing => "TimingSimpleCPU",
            Self::Minor => "MinorCPU",
        }
    }

    /// Memory mode the whole machine must run in when this model is selected.
    pub const fn memory_mode(self) -> MemoryMode {
        match self {
            Self::Atomic => MemoryMode::Atomic,
            Self::Timing | Self::Minor => MemoryMode::Timing,
        }
    }
}

impl fmt::Display for CpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CpuModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.name() == s)
            .ok_or_else(|| ConfigError::UnsupportedCpuModel(s.to_string()))
    }
}
