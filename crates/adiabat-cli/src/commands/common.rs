//! Shared helpers for CLI commands.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use tracing::debug;

use adiabat_sim::config::{ProblemConfig, RunConfig};
use adiabat_sim::pauli::PauliOp;
use adiabat_sim::run::RunReport;

/// Problem family selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemKind {
    /// Transverse-field Ising ring
    Ising,
    /// Random k-SAT
    Ksat,
}

/// Report format for `adiabat run`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Full report as pretty-printed JSON
    Json,
    /// One row per diagnostic sample
    Csv,
}

/// Problem and solver flags shared by `run` and `spectrum`.
///
/// Flags override values from the configuration file and `ADIABAT_*`
/// environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ProblemArgs {
    /// YAML configuration file
    #[arg(short, long, env = "ADIABAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Problem family
    #[arg(short, long, value_enum)]
    pub problem: Option<ProblemKind>,

    /// Number of sites (Ising) or variables (k-SAT)
    #[arg(short)]
    pub n: Option<usize>,

    /// Ising coupling J
    #[arg(long, allow_negative_numbers = true)]
    pub coupling: Option<f64>,

    /// Ising transverse field h
    #[arg(long, allow_negative_numbers = true)]
    pub field: Option<f64>,

    /// Number of k-SAT clauses
    #[arg(long)]
    pub clauses: Option<usize>,

    /// Literals per k-SAT clause
    #[arg(short)]
    pub k: Option<usize>,

    /// RNG seed for the k-SAT instance
    #[arg(long)]
    pub seed: Option<u64>,

    /// Schedule rate; the run lasts 1/rate
    #[arg(short, long)]
    pub rate: Option<f64>,

    /// Integrator step bound
    #[arg(long)]
    pub max_step: Option<f64>,

    /// Pauli basis of the k-SAT projectors (x, y, z)
    #[arg(long)]
    pub basis: Option<PauliOp>,

    /// Strength of the initial field Hamiltonian h₀ · Σ X (must be negative)
    #[arg(long, allow_negative_numbers = true)]
    pub initial_field: Option<f64>,
}

/// Resolve the effective configuration: defaults, then file and
/// environment, then command-line flags.
pub fn resolve_config(args: &ProblemArgs) -> Result<RunConfig> {
    let mut config = RunConfig::load(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let kind = args.problem.unwrap_or(match config.problem {
        ProblemConfig::Ising { .. } => ProblemKind::Ising,
        ProblemConfig::Ksat { .. } => ProblemKind::Ksat,
    });

    config.problem = match (kind, &config.problem) {
        (ProblemKind::Ising, ProblemConfig::Ising { n, coupling, field }) => ProblemConfig::Ising {
            n: args.n.unwrap_or(*n),
            coupling: args.coupling.unwrap_or(*coupling),
            field: args.field.unwrap_or(*field),
        },
        (ProblemKind::Ising, _) => ProblemConfig::Ising {
            n: args.n.unwrap_or(3),
            coupling: args.coupling.unwrap_or(1.0),
            field: args.field.unwrap_or(0.0),
        },
        (
            ProblemKind::Ksat,
            ProblemConfig::Ksat {
                num_variables,
                num_clauses,
                k,
                seed,
            },
        ) => ProblemConfig::Ksat {
            num_variables: args.n.unwrap_or(*num_variables),
            num_clauses: args.clauses.unwrap_or(*num_clauses),
            k: args.k.unwrap_or(*k),
            seed: args.seed.or(*seed),
        },
        (ProblemKind::Ksat, _) => ProblemConfig::Ksat {
            num_variables: args.n.unwrap_or(4),
            num_clauses: args.clauses.unwrap_or(3),
            k: args.k.unwrap_or(3),
            seed: args.seed,
        },
    };

    if let Some(rate) = args.rate {
        config.schedule.rate = rate;
    }
    if let Some(max_step) = args.max_step {
        config.integrator.max_step = max_step;
    }
    if let Some(basis) = args.basis {
        config.sat_basis = basis;
    }
    if let Some(h) = args.initial_field {
        config.initial_field = h;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    debug!(?config, "resolved run configuration");
    Ok(config)
}

/// Render a report in the requested format.
pub fn render_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}")),
        OutputFormat::Csv => Ok(report_csv(report)),
        OutputFormat::Table => Ok(report_table(report)),
    }
}

/// CSV with a header row and one row per diagnostic sample.
pub fn report_csv(report: &RunReport) -> String {
    let mut out = String::from("time,s,energy,ground_energy,residual,gap,ground_overlap,norm\n");
    for sample in report.trace.samples() {
        let gap = sample.gap.map(|g| g.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            sample.time,
            sample.s,
            sample.energy,
            sample.ground_energy,
            sample.residual(),
            gap,
            sample.ground_overlap,
            sample.norm
        );
    }
    out
}

/// Aligned text table followed by a short summary.
pub fn report_table(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>10} {:>7} {:>13} {:>13} {:>11} {:>10} {:>9}",
        "time", "s", "energy", "ground", "residual", "gap", "overlap"
    );
    for sample in report.trace.samples() {
        let gap = sample
            .gap
            .map_or_else(|| "-".to_string(), |g| format!("{g:.4e}"));
        let _ = writeln!(
            out,
            "  {:>10.4} {:>7.4} {:>13.8} {:>13.8} {:>11.3e} {:>10} {:>9.6}",
            sample.time,
            sample.s,
            sample.energy,
            sample.ground_energy,
            sample.residual(),
            gap,
            sample.ground_overlap
        );
    }
    out
}

/// Print the end-of-run summary.
pub fn print_summary(report: &RunReport) {
    println!(
        "\n{} Run complete ({} qubits, {} samples):",
        style("✓").green().bold(),
        report.num_qubits,
        report.trace.len()
    );
    if let Some(last) = report.final_sample() {
        println!("  Final energy:        {:.10}", last.energy);
        println!("  Final ground energy: {:.10}", last.ground_energy);
        println!(
            "  Residual:            {}",
            style(format!("{:.3e}", last.residual())).yellow()
        );
        println!("  Ground overlap:      {:.6}", last.ground_overlap);
    }
    if let Some(gap) = report.trace.min_gap() {
        println!("  Minimum gap:         {gap:.4e}");
    }
    println!("  Norm drift:          {:.2e}", report.trace.max_norm_drift());
    println!(
        "  Steps:               {} accepted, {} rejected, {} evaluations",
        report.stats.accepted, report.stats.rejected, report.stats.evaluations
    );
    if let Some(instance) = &report.instance {
        let verdict = if instance.is_satisfiable() {
            style("satisfiable").green()
        } else {
            style("unsatisfiable").red()
        };
        println!("  Instance:            {verdict}");
    }
}

/// Write `contents` to `path`.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
