//! Run command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use adiabat_sim::run::run_with;

use super::common::{
    OutputFormat, ProblemArgs, print_summary, render_report, resolve_config, write_output,
};

/// Execute the run command.
pub fn execute(
    args: &ProblemArgs,
    format: OutputFormat,
    output: Option<&Path>,
    stride: usize,
) -> Result<()> {
    let config = resolve_config(args)?;

    eprintln!(
        "{} Evolving {} on {} qubits (rate {}, T = {})",
        style("→").cyan().bold(),
        style(config.problem.name()).green(),
        config.problem.num_qubits(),
        config.schedule.rate,
        style(config.horizon()).yellow()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?,
    );
    spinner.set_message("Integrating Schrödinger equation...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let horizon = config.horizon();
    let report = run_with(&config, stride, |sample| {
        spinner.set_message(format!(
            "Diagnosing t = {:.3} / {horizon:.3} (s = {:.3})",
            sample.time, sample.s
        ));
    });
    spinner.finish_and_clear();
    let report = report.map_err(|e| anyhow::anyhow!("Run failed: {e}"))?;

    let rendered = render_report(&report, format)?;
    match output {
        Some(path) => {
            write_output(path, &rendered)?;
            eprintln!("  Report written to {}", style(path.display()).green());
        }
        None => print!("{rendered}"),
    }

    if format == OutputFormat::Table {
        print_summary(&report);
    }

    Ok(())
}
