//! Spectrum command implementation.
//!
//! Diagonalise H(s) = (1 − s)·H₀ + s·H₁ for the configured problem.

use anyhow::Result;
use console::style;

use adiabat_sim::diagnostics::spectrum;
use adiabat_sim::generator::instantaneous_hamiltonian;
use adiabat_sim::run::build_problem;

use super::common::{ProblemArgs, resolve_config};

/// Execute the spectrum command.
pub fn execute(args: &ProblemArgs, s: f64, levels: usize) -> Result<()> {
    if !(0.0..=1.0).contains(&s) {
        anyhow::bail!("Interpolation parameter s must lie in [0, 1], got {s}");
    }
    let config = resolve_config(args)?;
    let (problem, _) =
        build_problem(&config).map_err(|e| anyhow::anyhow!("Failed to build problem: {e}"))?;

    let h = instantaneous_hamiltonian(&problem.initial, &problem.target, s)?;
    let spec = spectrum(&h).map_err(|e| anyhow::anyhow!("Diagonalisation failed: {e}"))?;

    println!(
        "{} Spectrum of {} at s = {} ({} levels)",
        style("→").cyan().bold(),
        style(config.problem.name()).green(),
        s,
        spec.eigenvalues().len()
    );
    for (i, e) in spec.eigenvalues().iter().take(levels).enumerate() {
        let marker = if i < spec.ground_degeneracy() {
            style("●").green()
        } else {
            style("○").dim()
        };
        println!("  {marker} {i:>4}  {e:>16.10}");
    }
    if spec.eigenvalues().len() > levels {
        println!("  ... and {} more", spec.eigenvalues().len() - levels);
    }

    println!();
    println!("  Ground energy:     {:.10}", spec.ground_energy());
    println!("  Ground degeneracy: {}", spec.ground_degeneracy());
    match spec.gap() {
        Some(gap) => println!("  Gap:               {}", style(format!("{gap:.6e}")).yellow()),
        None => println!("  Gap:               {}", style("none (H ∝ I)").dim()),
    }

    Ok(())
}
