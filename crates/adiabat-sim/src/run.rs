//! End-to-end run: build H₀ and H₁, evolve, diagnose.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{ProblemConfig, RunConfig};
use crate::diagnostics::{DiagnosticSample, EnergyTrace, analyze_with};
use crate::error::SimResult;
use crate::evolution::AdiabaticEvolution;
use crate::hamiltonian::{DenseHamiltonian, build};
use crate::ode::IntegrationStats;
use crate::problems::{Instance, ising, random_instance, sat_hamiltonian, transverse_field};
use crate::schedule::LinearSchedule;

/// The two endpoint Hamiltonians of a run.
#[derive(Debug, Clone)]
pub struct Problem {
    /// H₀ = initial_field · Σ X_i.
    pub initial: DenseHamiltonian,
    /// H₁, the problem Hamiltonian.
    pub target: DenseHamiltonian,
    /// The generated instance for k-SAT problems.
    pub instance: Option<Instance>,
}

/// Build H₀ and H₁ for `config`.
///
/// A k-SAT problem without a seed draws one from entropy; the returned
/// config records it so the instance can be regenerated.
pub fn build_problem(config: &RunConfig) -> SimResult<(Problem, RunConfig)> {
    config.validate()?;
    let mut resolved = config.clone();
    let n = config.problem.num_qubits();
    let initial = build(&transverse_field(n, config.initial_field)?, n)?;

    let (target, instance) = match &mut resolved.problem {
        ProblemConfig::Ising { n, coupling, field } => {
            (build(&ising(*n, *coupling, *field)?, *n)?, None)
        }
        ProblemConfig::Ksat {
            num_variables,
            num_clauses,
            k,
            seed,
        } => {
            let seed = *seed.get_or_insert_with(rand::random);
            let mut rng = StdRng::seed_from_u64(seed);
            let instance = random_instance(*num_variables, *num_clauses, *k, &mut rng)?;
            let h = sat_hamiltonian(&instance, *num_variables, config.sat_basis)?;
            (h, Some(instance))
        }
    };

    Ok((
        Problem {
            initial,
            target,
            instance,
        },
        resolved,
    ))
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Configuration used, with any generated seed filled in.
    pub config: RunConfig,
    /// Number of qubits.
    pub num_qubits: usize,
    /// The k-SAT instance, if any.
    pub instance: Option<Instance>,
    /// Integrator counters.
    pub stats: IntegrationStats,
    /// Per-sample energy diagnostics.
    pub trace: EnergyTrace,
}

impl RunReport {
    /// E − E₀ at the final time.
    pub fn final_residual(&self) -> Option<f64> {
        self.trace.final_residual()
    }

    /// The final diagnostic sample.
    pub fn final_sample(&self) -> Option<&DiagnosticSample> {
        self.trace.last()
    }
}

/// Run with every trajectory sample diagnosed.
pub fn run(config: &RunConfig) -> SimResult<RunReport> {
    run_with(config, 1, |_| {})
}

/// Run, diagnosing every `stride`-th trajectory sample (endpoints always
/// included) and reporting each diagnosed sample to `on_sample`.
#[instrument(skip(config, on_sample), fields(problem = config.problem.name()))]
pub fn run_with<F>(config: &RunConfig, stride: usize, on_sample: F) -> SimResult<RunReport>
where
    F: FnMut(&DiagnosticSample),
{
    let (problem, resolved) = build_problem(config)?;
    let num_qubits = problem.initial.num_qubits();

    let schedule = LinearSchedule::new(resolved.schedule.rate)?;
    let evolution = AdiabaticEvolution::new(problem.initial, problem.target, schedule)?
        .with_options(resolved.integrator.ode_options());

    let trajectory = evolution.run()?.sampled(stride);
    let trace = analyze_with(evolution.hamiltonian(), &trajectory, on_sample)?;

    if let Some(last) = trace.last() {
        info!(
            num_qubits,
            energy = last.energy,
            ground_energy = last.ground_energy,
            residual = last.residual(),
            "run complete"
        );
    }

    Ok(RunReport {
        config: resolved,
        num_qubits,
        instance: problem.instance,
        stats: trajectory.stats(),
        trace,
    })
}
