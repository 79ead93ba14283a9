//! Octavo Run - executes a program file and prints the final state.
//!
//! This binary wires the loader to the machine engine: it decodes the
//! program file, runs it to completion or failure, and dumps the stack
//! and register file. Any load or execution failure terminates the
//! process with a non-zero exit code.

use std::path::PathBuf;

use clap::Parser;
use octavo_isa::load_program;
use octavo_vm::Machine;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "octavo-run")]
#[command(about = "Run an Octavo program and print the final machine state")]
struct Cli {
    /// Path to the program source file
    program: PathBuf,

    /// Suppress the final state dump
    #[arg(long)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "octavo_run=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Loading program from: {}", cli.program.display());

    let program = match load_program(&cli.program) {
        Ok(program) => program,
        Err(e) => {
            error!("Failed to load program: {}", e);
            std::process::exit(1);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.run(&program) {
        error!("Execution failed: {}", e);
        std::process::exit(1);
    }

    if !cli.quiet {
        dump_state(&machine);
    }
}

/// Print stack contents and register values, one `index: value` line
/// each, in the driver's observational format.
fn dump_state(machine: &Machine) {
    println!("\nStack\n");
    for (index, value) in machine.stack().iter().enumerate() {
        println!("{index}: {value}");
    }

    println!("\nRegisters\n");
    for (index, value) in machine.registers().slots().iter().enumerate() {
        println!("Register {index}: {value}");
    }
}
