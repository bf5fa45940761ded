//! Kernel backed by an external simulator process.
//!
//! The simulator executable is driven over its stdin/stdout with a line protocol:
//! 1. **Instantiate:** `rvfs` writes the machine description as one JSON line. The
//!    simulator answers `@ready`, or `@error <message>` if it rejects the machine.
//! 2. **Simulate:** `rvfs` writes `simulate` and closes stdin. The simulator prints
//!    `@exit {"cause": ..., "tick": ...}` when execution ends, then exits.
//!
//! Every other line the simulator prints (console output, its own logging) is passed
//! through to stdout unchanged. Stderr is inherited. A simulator still alive after its
//! exit event is killed.

use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::common::SimError;
use crate::sim::kernel::{ExitEvent, Kernel, LiveMachine};
use crate::sim::loader;
use crate::soc::MachineDescription;

/// Reply accepting a machine description.
pub const READY: &str = "@ready";
/// Prefix of a reply rejecting a machine description.
pub const ERROR_PREFIX: &str = "@error ";
/// Prefix of the exit event line.
pub const EXIT_PREFIX: &str = "@exit ";
/// Command starting execution.
pub const SIMULATE: &str = "simulate";

/// Kernel that spawns an external simulator for every instantiation.
#[derive(Debug, Clone)]
pub struct ProcessKernel {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessKernel {
    /// Creates a kernel running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument to the simulator command line.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends arguments to the simulator command line.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Simulator executable.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Kernel for ProcessKernel {
    type Machine = ProcessMachine;

    fn instantiate(&mut self, description: MachineDescription) -> Result<ProcessMachine, SimError> {
        let image = loader::probe_boot_image(description.bootloader())?;
        debug!(path = %image.path.display(), size = image.size, "boot image found");

        let payload = serde_json::to_string(&description).map_err(|e| {
            SimError::InstantiationFailure(format!("could not encode machine description: {e}"))
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                SimError::InstantiationFailure(format!(
                    "could not start simulator '{}': {e}",
                    self.program.display()
                ))
            })?;
        debug!(program = %self.program.display(), pid = child.id(), "simulator started");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(BufReader::new);
        let mut machine = ProcessMachine {
            child,
            stdin,
            stdout,
            finished: false,
        };

        machine.handshake(&payload)?;
        Ok(machine)
    }
}

/// Simulator process that accepted a machine description.
///
/// Dropping it before the run ends kills the process.
#[derive(Debug)]
pub struct ProcessMachine {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    finished: bool,
}

impl ProcessMachine {
    fn handshake(&mut self, payload: &str) -> Result<(), SimError> {
        self.send_line(payload).map_err(|e| {
            SimError::InstantiationFailure(format!("could not send machine description: {e}"))
        })?;

        loop {
            match self.read_line() {
                Ok(Some(line)) if line == READY => return Ok(()),
                Ok(Some(line)) => match line.strip_prefix(ERROR_PREFIX) {
                    Some(message) => return Err(SimError::InstantiationFailure(message.to_string())),
                    None => println!("{line}"),
                },
                Ok(None) => {
                    return Err(SimError::InstantiationFailure(
                        "simulator exited before accepting the machine description".to_string(),
                    ));
                }
                Err(e) => {
                    return Err(SimError::InstantiationFailure(format!(
                        "lost contact with simulator: {e}"
                    )));
                }
            }
        }
    }

    fn run_to_exit(&mut self) -> ExitEvent {
        let sent = self.send_line(SIMULATE);
        self.stdin = None;
        if let Err(e) = sent {
            return lost(format!("could not start simulation: {e}"));
        }

        loop {
            match self.read_line() {
                Ok(Some(line)) => match line.strip_prefix(EXIT_PREFIX) {
                    Some(json) => {
                        return serde_json::from_str(json).unwrap_or_else(|e| {
                            warn!(line = %line, "malformed exit event");
                            lost(format!("malformed exit event: {e}"))
                        });
                    }
                    None => println!("{line}"),
                },
                Ok(None) => {
                    let cause = match self.child.wait() {
                        Ok(status) => format!("simulator exited without an exit event ({status})"),
                        Err(e) => format!("simulator exited without an exit event: {e}"),
                    };
                    return lost(cause);
                }
                Err(e) => return lost(format!("lost contact with simulator: {e}")),
            }
        }
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "simulator stdin closed"))?;
        writeln!(stdin, "{line}")?;
        stdin.flush()
    }

    /// Next line without its terminator, or `None` at end of stream.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let stdout = self
            .stdout
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "simulator stdout closed"))?;
        let mut line = String::new();
        if stdout.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    /// Collects the child, killing it first if it outlived its exit event.
    fn reap(&mut self) {
        self.stdin = None;
        self.stdout = None;
        match self.child.try_wait() {
            Ok(Some(status)) => debug!(%status, "simulator exited"),
            Ok(None) => {
                debug!(pid = self.child.id(), "simulator still running after exit event, killing");
                if let Err(e) = self.child.kill() {
                    warn!(error = %e, "could not kill simulator");
                }
                if let Err(e) = self.child.wait() {
                    warn!(error = %e, "could not reap simulator");
                }
            }
            Err(e) => warn!(error = %e, "could not reap simulator"),
        }
        self.finished = true;
    }
}

impl LiveMachine for ProcessMachine {
    fn simulate(&mut self) -> ExitEvent {
        if self.finished {
            return lost("simulator already exited".to_string());
        }
        let event = self.run_to_exit();
        self.reap();
        event
    }
}

impl Drop for ProcessMachine {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Exit event for a run that ended without the simulator reporting one.
fn lost(cause: String) -> ExitEvent {
    ExitEvent { cause, tick: 0 }
}
