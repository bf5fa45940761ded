use mockall::mock;
use rvfs_core::MachineDescription;
use rvfs_core::common::SimError;
use rvfs_core::sim::{ExitEvent, Kernel, LiveMachine};

mock! {
    pub Machine {}
    impl LiveMachine for Machine {
        fn simulate(&mut self) -> ExitEvent;
    }
}

mock! {
    pub SimKernel {}
    impl Kernel for SimKernel {
        type Machine = MockMachine;
        fn instantiate(&mut self, description: MachineDescription) -> Result<MockMachine, SimError>;
    }
}

/// A machine that simulates exactly once and exits with `cause` at `tick`.
pub fn machine_exiting(cause: &str, tick: u64) -> MockMachine {
    let event = ExitEvent {
        cause: cause.to_string(),
        tick,
    };
    let mut machine = MockMachine::new();
    machine.expect_simulate().times(1).return_once(move || event);
    machine
}

/// A kernel that accepts exactly one description and returns `machine`.
pub fn kernel_accepting(machine: MockMachine) -> MockSimKernel {
    let mut kernel = MockSimKernel::new();
    kernel
        .expect_instantiate()
        .times(1)
        .return_once(move |_| Ok(machine));
    kernel
}

/// A kernel that must never be asked to instantiate anything.
pub fn kernel_untouched() -> MockSimKernel {
    let mut kernel = MockSimKernel::new();
    kernel.expect_instantiate().never();
    kernel
}
