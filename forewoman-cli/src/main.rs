//! forewoman — run the processes declared in a Procfile.
//!
//! # Usage
//!
//! ```text
//! forewoman start [PROCESS] [-c web=2,worker=1] [-f Procfile] [-d DIR] [-e .env,.env.local] [-p 5000]
//! forewoman check [PROCESS] [same options] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, start::StartArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "forewoman",
    version,
    about = "Run the processes declared in a Procfile",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start every process type (or one named type) and stream their output.
    Start(StartArgs),

    /// Validate the Procfile and print the instances `start` would run.
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    forewoman_supervisor::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}
