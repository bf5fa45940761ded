//! Machine description construction and the top-level `MachineDescription` type.
//!
//! This module resolves run options into a machine. It performs:
//! 1. **Validation:** Rejects a missing boot binary and unsupported CPU models before anything is built.
//! 2. **Mode resolution:** Looks up the memory mode implied by the CPU model, exactly once.
//! 3. **Memory:** Builds the controller topology through [`memory::configure`] in that mode.
//! 4. **Assembly:** Threads the same mode into the CPU and every memory controller.
//!
//! Resolution is pure; the kernel is not touched until the run controller instantiates
//! the description.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::ConfigError;
use crate::config::{Config, MemoryConfig};
use crate::cpu::{CpuModel, MemoryMode};
use crate::soc::memory::{self, MemoryTopology};

/// Options chosen by the operator for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// CPU model name (`atomic`, `timing` or `minor`).
    pub cpu: String,
    /// Boot image to load into the machine.
    pub binary: Option<PathBuf>,
    /// Pause before execution until a remote debugger attaches.
    pub wait_for_gdb: bool,
}

impl RunOptions {
    /// Options for booting `binary` on the default CPU.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(binary.into()),
            ..Self::default()
        }
    }

    /// Selects the CPU model by name.
    #[must_use]
    pub fn with_cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = cpu.into();
        self
    }

    /// Sets the debug-wait flag.
    #[must_use]
    pub fn with_wait_for_gdb(mut self, wait: bool) -> Self {
        self.wait_for_gdb = wait;
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cpu: CpuModel::default().name().to_string(),
            binary: None,
            wait_for_gdb: false,
        }
    }
}

/// CPU selection inside a machine description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSpec {
    /// Selected timing model.
    pub model: CpuModel,
    /// Kernel class implementing the model.
    pub class_name: String,
    /// Memory mode the CPU issues requests in.
    pub mem_mode: MemoryMode,
}

/// Remote debugging settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSpec {
    /// Hold the CPU at reset until a debugger attaches.
    pub wait_for_gdb: bool,
    /// Port the kernel listens on for the debugger.
    pub gdb_port: u16,
}

/// Fully resolved machine, ready to hand to a kernel.
///
/// Only the resolver builds one. There are no mutators; the description moves into
/// the kernel on instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDescription {
    full_system: bool,
    mem_mode: MemoryMode,
    cpu: CpuSpec,
    memory: MemoryConfig,
    topology: MemoryTopology,
    bootloader: PathBuf,
    debug: DebugSpec,
}

impl MachineDescription {
    /// Machine-wide memory mode.
    pub const fn mem_mode(&self) -> MemoryMode {
        self.mem_mode
    }

    /// CPU selection.
    pub const fn cpu(&self) -> &CpuSpec {
        &self.cpu
    }

    /// Memory technology and channel count.
    pub const fn memory(&self) -> &MemoryConfig {
        &self.memory
    }

    /// Memory controllers.
    pub const fn topology(&self) -> &MemoryTopology {
        &self.topology
    }

    /// Boot image path.
    pub fn bootloader(&self) -> &Path {
        &self.bootloader
    }

    /// Remote debugging settings.
    pub const fn debug(&self) -> DebugSpec {
        self.debug
    }

    /// Always true: the machine boots a full system rather than emulating syscalls.
    pub const fn full_system(&self) -> bool {
        self.full_system
    }

    /// Checks that every component runs in the machine-wide memory mode, that the CPU
    /// class implements the CPU model, and that the controllers match the memory
    /// configuration.
    ///
    /// Descriptions from the resolver always pass; this guards descriptions that
    /// arrived some other way (e.g. deserialized).
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bootloader.as_os_str().is_empty() {
            return Err(ConfigError::MissingBootBinary);
        }

        let expected_class = self.cpu.model.class_name();
        if self.cpu.class_name != expected_class {
            return Err(ConfigError::CpuClassMismatch {
                model: self.cpu.model.to_string(),
                expected: expected_class.to_string(),
                found: self.cpu.class_name.clone(),
            });
        }

        for found in [self.cpu.model.memory_mode(), self.cpu.mem_mode] {
            if found != self.mem_mode {
                return Err(ConfigError::MemoryModeMismatch {
                    component: format!("cpu ({})", self.cpu.class_name),
                    expected: self.mem_mode,
                    found,
                });
            }
        }

        if self.topology.is_empty() {
            return Err(ConfigError::EmptyMemoryTopology);
        }
        if self.topology.len() != self.memory.channels {
            return Err(ConfigError::MemoryTopologyMismatch(format!(
                "{} controllers for {} channels",
                self.topology.len(),
                self.memory.channels
            )));
        }
        for (i, ctrl) in self.topology.controllers().iter().enumerate() {
            if ctrl.technology != self.memory.technology {
                return Err(ConfigError::MemoryTopologyMismatch(format!(
                    "mem_ctrls[{i}] is {}, memory is {}",
                    ctrl.technology, self.memory.technology
                )));
            }
            if ctrl.mem_mode != self.mem_mode {
                return Err(ConfigError::MemoryModeMismatch {
                    component: format!("mem_ctrls[{i}]"),
                    expected: self.mem_mode,
                    found: ctrl.mem_mode,
                });
            }
        }

        Ok(())
    }
}

/// Turns run options into machine descriptions under a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: Config,
}

impl Resolver {
    /// Creates a resolver using `config` for memory policy and the memory map.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration this resolver builds machines from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a CPU model name, boot binary and debug-wait flag into a machine.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::MissingBootBinary`] if `boot_binary` is empty.
    /// * [`ConfigError::UnsupportedCpuModel`] if `cpu` is not a known model.
    /// * Memory configuration errors from [`memory::configure`].
    pub fn resolve(
        &self,
        cpu: &str,
        boot_binary: impl AsRef<Path>,
        wait_for_gdb: bool,
    ) -> Result<MachineDescription, ConfigError> {
        let boot_binary = boot_binary.as_ref();
        if boot_binary.as_os_str().is_empty() {
            return Err(ConfigError::MissingBootBinary);
        }

        let model: CpuModel = cpu.parse()?;
        let mem_mode = model.memory_mode();

        let memory = self.config.memory.clone();
        let topology = memory::configure(&memory, &self.config.system, mem_mode)?;

        debug!(
            cpu = model.class_name(),
            %mem_mode,
            bootloader = %boot_binary.display(),
            wait_for_gdb,
            "resolved machine description"
        );

        Ok(MachineDescription {
            full_system: true,
            mem_mode,
            cpu: CpuSpec {
                model,
                class_name: model.class_name().to_string(),
                mem_mode,
            },
            memory,
            topology,
            bootloader: boot_binary.to_path_buf(),
            debug: DebugSpec {
                wait_for_gdb,
                gdb_port: self.config.system.gdb_port,
            },
        })
    }

    /// Resolves a [`RunOptions`] bundle.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve`]; a `None` binary is [`ConfigError::MissingBootBinary`].
    pub fn resolve_options(&self, options: &RunOptions) -> Result<MachineDescription, ConfigError> {
        let binary = options
            .binary
            .as_deref()
            .ok_or(ConfigError::MissingBootBinary)?;
        self.resolve(&options.cpu, binary, options.wait_for_gdb)
    }
}

/// Resolves a machine with the default configuration.
///
/// # Examples
///
/// ```
/// use rvfs_core::{MemoryMode, resolve};
///
/// let machine = resolve("minor", "/img/kernel.bin", false).unwrap();
/// assert_eq!(machine.mem_mode(), MemoryMode::Timing);
/// assert_eq!(machine.memory().technology, "DDR3_1600_8x8");
/// ```
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve(
    cpu: &str,
    boot_binary: impl AsRef<Path>,
    wait_for_gdb: bool,
) -> Result<MachineDescription, ConfigError> {
    Resolver::default().resolve(cpu, boot_binary, wait_for_gdb)
}
