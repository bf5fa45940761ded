//! Simulation kernel interface.
//!
//! The kernel owns everything below the machine description: object creation, device
//! models, memory timing and the event queue. The run controller only needs two calls
//! from it.

use serde::{Deserialize, Serialize};

use crate::common::SimError;
use crate::soc::MachineDescription;

/// Kernel signal that simulated execution has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitEvent {
    /// Human-readable reason (exit instruction, fault, tick limit, ...).
    pub cause: String,
    /// Simulated time at exit, in ticks.
    pub tick: u64,
}

/// A simulation kernel that can turn a machine description into a live machine.
pub trait Kernel {
    /// Machine produced by a successful instantiation.
    type Machine: LiveMachine;

    /// Builds the live object graph for `description`.
    ///
    /// This is where the boot image is first checked for existence.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InstantiationFailure`] with the kernel's own message if the
    /// configuration is rejected.
    fn instantiate(&mut self, description: MachineDescription) -> Result<Self::Machine, SimError>;
}

/// An instantiated machine.
pub trait LiveMachine {
    /// Runs the machine and blocks until the kernel raises an exit event.
    ///
    /// Never times out on its own. Kernel faults are reported through the event's
    /// cause, not as errors.
    fn simulate(&mut self) -> ExitEvent;
}
