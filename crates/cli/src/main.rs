//! Full-system RISC-V run CLI.
//!
//! This binary boots one machine per invocation. It performs:
//! 1. **Resolve:** Turns `--cpu`, `--binary` and `--wait-for-gdb` into a machine description.
//! 2. **Instantiate:** Hands the description to the external simulator kernel.
//! 3. **Run:** Blocks until the kernel exits, then prints the cause and simulated tick.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rvfs_core::sim::ProcessKernel;
use rvfs_core::{RunController, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "rvfs",
    author,
    version,
    about = "Full-system RISC-V simulation run",
    long_about = "Assemble a full-system RISC-V machine (CPU model, DDR3 memory, boot image) and run it on an external simulator kernel until it exits.\n\nMemory is fixed to one DDR3_1600_8x8 channel.\n\nExamples:\n  rvfs -b bbl.bin\n  rvfs -b bbl.bin --cpu minor\n  rvfs -b bbl.bin -w   (attach gdb on port 7000)"
)]
struct Cli {
    /// The binary to run.
    #[arg(short, long)]
    binary: PathBuf,

    /// CPU model to use (atomic, timing or minor).
    #[arg(long, default_value = "atomic")]
    cpu: String,

    /// Wait for remote gdb connection before starting simulation.
    #[arg(short, long)]
    wait_for_gdb: bool,

    /// Simulator kernel executable.
    #[arg(long, env = "RVFS_SIMULATOR", default_value = "rvsim-kernel")]
    simulator: PathBuf,

    /// Extra argument for the simulator kernel (repeatable).
    #[arg(long = "simulator-arg", allow_hyphen_values = true)]
    simulator_args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let options = RunOptions::new(cli.binary)
        .with_cpu(cli.cpu)
        .with_wait_for_gdb(cli.wait_for_gdb);
    debug!(
        simulator = %cli.simulator.display(),
        args = ?cli.simulator_args,
        "using simulator kernel"
    );
    let kernel = ProcessKernel::new(cli.simulator).args(cli.simulator_args);

    let mut controller = RunController::new(kernel);
    match controller.execute(&options) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
