//! adiabat Command-Line Interface
//!
//! The main entry point for the `adiabat` tool: run adiabatic evolutions,
//! generate k-SAT instances and inspect instantaneous spectra.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OutputFormat, ProblemArgs};
use commands::{instance, run, spectrum, version};

/// adiabat - dense adiabatic quantum evolution for Ising and k-SAT problems
#[derive(Parser)]
#[command(name = "adiabat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve from the transverse-field ground state into a problem Hamiltonian
    Run {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Report format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Diagnose every N-th trajectory sample
        #[arg(long, default_value = "1")]
        stride: usize,
    },

    /// Generate a random k-SAT instance
    Instance {
        /// Number of variables
        #[arg(short, default_value = "4")]
        n: usize,

        /// Number of clauses
        #[arg(long, default_value = "3")]
        clauses: usize,

        /// Literals per clause
        #[arg(short, default_value = "3")]
        k: usize,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of DIMACS
        #[arg(long)]
        json: bool,
    },

    /// Show the low-lying spectrum of H(s)
    Spectrum {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Interpolation parameter s in [0, 1]
        #[arg(short, long, default_value = "1.0")]
        s: f64,

        /// Number of levels to print
        #[arg(long, default_value = "8")]
        levels: usize,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            problem,
            format,
            output,
            stride,
        } => run::execute(&problem, format, output.as_deref(), stride),

        Commands::Instance {
            n,
            clauses,
            k,
            seed,
            json,
        } => instance::execute(n, clauses, k, seed, json),

        Commands::Spectrum { problem, s, levels } => spectrum::execute(&problem, s, levels),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
