//! Run controller: owns the kernel and walks one run through its states.
//!
//! A run goes `Unconfigured → Resolved → Instantiated → Running → Terminated`, strictly
//! forward and once. Each stage consumes what the previous one produced, and the
//! controller rejects any stage called out of order.

use std::fmt;

use tracing::{debug, info};

use crate::common::SimError;
use crate::config::defaults;
use crate::sim::kernel::{ExitEvent, Kernel, LiveMachine};
use crate::soc::{MachineDescription, Resolver, RunOptions};

/// Stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Nothing resolved yet.
    #[default]
    Unconfigured,
    /// A machine description exists.
    Resolved,
    /// The kernel accepted the description.
    Instantiated,
    /// Blocked in the kernel.
    Running,
    /// The kernel raised its exit event.
    Terminated,
}

impl RunState {
    /// The only state reachable from this one.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Unconfigured => Some(Self::Resolved),
            Self::Resolved => Some(Self::Instantiated),
            Self::Instantiated => Some(Self::Running),
            Self::Running => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }

    /// Lowercase state name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Resolved => "resolved",
            Self::Instantiated => "instantiated",
            Self::Running => "running",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a run: the kernel's exit cause and the simulated time.
///
/// A clean exit and a crash look the same here; only the cause text differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    cause: String,
    tick: u64,
}

impl TerminationReport {
    /// Cause reported when the kernel gives none.
    pub const UNKNOWN_CAUSE: &'static str = "simulation ended without a reported cause";

    /// Builds the report for a kernel exit event.
    pub fn from_exit(event: ExitEvent) -> Self {
        let cause = if event.cause.trim().is_empty() {
            Self::UNKNOWN_CAUSE.to_string()
        } else {
            event.cause
        };
        Self {
            cause,
            tick: event.tick,
        }
    }

    /// Exit cause, verbatim from the kernel.
    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// Simulated time at exit, in ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time at exit, in seconds.
    pub fn seconds(&self) -> f64 {
        self.tick as f64 / defaults::TICKS_PER_SECOND as f64
    }
}

impl fmt::Display for TerminationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exiting because {} @ {}", self.cause, self.tick)
    }
}

/// Drives one run through a kernel.
#[derive(Debug)]
pub struct RunController<K> {
    kernel: K,
    resolver: Resolver,
    state: RunState,
}

impl<K: Kernel> RunController<K> {
    /// Creates a controller that resolves with the default configuration.
    pub fn new(kernel: K) -> Self {
        Self::with_resolver(kernel, Resolver::default())
    }

    /// Creates a controller with an explicit resolver.
    pub fn with_resolver(kernel: K, resolver: Resolver) -> Self {
        Self {
            kernel,
            resolver,
            state: RunState::Unconfigured,
        }
    }

    /// Current stage of the run.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// The kernel this controller drives.
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Resolves `options` into a machine description.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the options are rejected, or
    /// [`SimError::InvalidTransition`] if a machine was already resolved.
    pub fn resolve(&mut self, options: &RunOptions) -> Result<MachineDescription, SimError> {
        self.check(RunState::Resolved)?;
        let description = self.resolver.resolve_options(options)?;
        self.enter(RunState::Resolved);
        Ok(description)
    }

    /// Hands `description` to the kernel.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the description is inconsistent,
    /// [`SimError::InstantiationFailure`] if the kernel rejects it, or
    /// [`SimError::InvalidTransition`] if no description was resolved.
    pub fn instantiate(&mut self, description: MachineDescription) -> Result<K::Machine, SimError> {
        self.check(RunState::Instantiated)?;
        description.validate()?;
        let machine = self.kernel.instantiate(description)?;
        self.enter(RunState::Instantiated);
        Ok(machine)
    }

    /// Runs `machine` until the kernel raises its exit event.
    ///
    /// Blocks the calling thread for the whole simulation.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidTransition`] if nothing was instantiated or the run already
    /// terminated. Kernel faults are not errors; they end up in the report's cause.
    pub fn run(&mut self, mut machine: K::Machine) -> Result<TerminationReport, SimError> {
        self.check(RunState::Running)?;
        self.enter(RunState::Running);
        info!("starting simulation");

        let report = TerminationReport::from_exit(machine.simulate());

        self.enter(RunState::Terminated);
        info!(
            cause = report.cause(),
            tick = report.tick(),
            seconds = report.seconds(),
            "simulation exited"
        );
        Ok(report)
    }

    /// Resolves, instantiates and runs `options` in one go.
    ///
    /// Stops at the first failure; nothing is retried.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve`](Self::resolve) or [`instantiate`](Self::instantiate).
    pub fn execute(&mut self, options: &RunOptions) -> Result<TerminationReport, SimError> {
        let description = self.resolve(options)?;
        let machine = self.instantiate(description)?;
        self.run(machine)
    }

    fn check(&self, to: RunState) -> Result<(), SimError> {
        if self.state.next() == Some(to) {
            Ok(())
        } else {
            Err(SimError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn enter(&mut self, to: RunState) {
        debug!(from = %self.state, %to, "run state transition");
        self.state = to;
    }
}
