//! Simulation run control.
//!
//! Provides the kernel interface, the run controller that drives a machine description
//! through instantiation and simulation, and a kernel backed by an external simulator
//! process.

/// Kernel and live machine traits, exit events.
pub mod kernel;
/// Boot image probing.
pub mod loader;
/// Kernel implementation driving an external simulator process.
pub mod process;
/// Run controller state machine and termination report.
pub mod simulator;

pub use kernel::{ExitEvent, Kernel, LiveMachine};
pub use process::{ProcessKernel, ProcessMachine};
pub use simulator::{RunController, RunState, TerminationReport};
