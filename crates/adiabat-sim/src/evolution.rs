//! Adiabatic evolution driver.
//!
//! Starts from the uniform superposition |+⟩^⊗n, the ground state of a
//! transverse field −Σ X_i, and integrates
//!
//!   dψ/dt = −i · H(s(t)) · ψ,    H(s) = (1 − s)·H₀ + s·H₁
//!
//! over [0, T] with the adaptive solver in [`crate::ode`].
//!
//! # Example
//!
//! ```rust
//! use adiabat_sim::evolution::AdiabaticEvolution;
//! use adiabat_sim::hamiltonian::build;
//! use adiabat_sim::problems::{ising, transverse_field};
//! use adiabat_sim::schedule::LinearSchedule;
//!
//! let h0 = build(&transverse_field(3, -1.0).unwrap(), 3).unwrap();
//! let h1 = build(&ising(3, 1.0, 0.0).unwrap(), 3).unwrap();
//! let evol = AdiabaticEvolution::new(h0, h1, LinearSchedule::new(0.5).unwrap())
//!     .unwrap()
//!     .with_max_step(0.1);
//! let traj = evol.run().unwrap();
//! assert_eq!(*traj.times().last().unwrap(), 2.0);
//! ```

use ndarray::Array1;
use num_complex::Complex64;
use tracing::{debug, info};

use crate::error::SimResult;
use crate::generator::InterpolatedHamiltonian;
use crate::hamiltonian::{DenseHamiltonian, check_qubit_count};
use crate::ode::{OdeOptions, integrate};
use crate::schedule::Schedule;

pub use crate::ode::Trajectory;

/// Equal amplitude 1/√(2^n) on every basis state.
pub fn uniform_superposition(n: usize) -> SimResult<Array1<Complex64>> {
    check_qubit_count(n)?;
    let dim = 1usize << n;
    let amp = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
    Ok(Array1::from_elem(dim, amp))
}

/// Integrate `rhs` over `t_span` from `initial_state` with steps no longer
/// than `max_step`, using the default tolerances.
pub fn evolve<F>(
    rhs: F,
    t_span: (f64, f64),
    initial_state: &Array1<Complex64>,
    max_step: f64,
) -> SimResult<Trajectory>
where
    F: FnMut(f64, &Array1<Complex64>) -> SimResult<Array1<Complex64>>,
{
    evolve_with(
        rhs,
        t_span,
        initial_state,
        &OdeOptions::default().with_max_step(max_step),
    )
}

/// [`evolve`] with explicit solver options.
pub fn evolve_with<F>(
    rhs: F,
    t_span: (f64, f64),
    initial_state: &Array1<Complex64>,
    options: &OdeOptions,
) -> SimResult<Trajectory>
where
    F: FnMut(f64, &Array1<Complex64>) -> SimResult<Array1<Complex64>>,
{
    integrate(rhs, t_span, initial_state, options)
}

/// Adiabatic evolution of the uniform superposition under H(s(t)).
pub struct AdiabaticEvolution<S> {
    hamiltonian: InterpolatedHamiltonian<S>,
    options: OdeOptions,
    /// End time; defaults to the schedule horizon.
    horizon: Option<f64>,
}

impl<S: Schedule> AdiabaticEvolution<S> {
    /// Construct from the two endpoint Hamiltonians and a schedule.
    pub fn new(
        h_initial: DenseHamiltonian,
        h_final: DenseHamiltonian,
        schedule: S,
    ) -> SimResult<Self> {
        Ok(Self::from_interpolated(InterpolatedHamiltonian::new(
            h_initial, h_final, schedule,
        )?))
    }

    /// Wrap an existing interpolated Hamiltonian.
    pub fn from_interpolated(hamiltonian: InterpolatedHamiltonian<S>) -> Self {
        Self {
            hamiltonian,
            options: OdeOptions::default(),
            horizon: None,
        }
    }

    /// Bound the integrator step size.
    #[must_use]
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.options.max_step = max_step;
        self
    }

    /// Override solver tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.options = self.options.with_tolerances(rtol, atol);
        self
    }

    /// Replace all solver options.
    #[must_use]
    pub fn with_options(mut self, options: OdeOptions) -> Self {
        self.options = options;
        self
    }

    /// Integrate to `horizon` instead of the schedule's own horizon.
    ///
    /// Times past the schedule horizon evolve under the constant H₁.
    #[must_use]
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// The interpolated Hamiltonian being evolved under.
    pub fn hamiltonian(&self) -> &InterpolatedHamiltonian<S> {
        &self.hamiltonian
    }

    /// Solver options in effect.
    pub fn options(&self) -> &OdeOptions {
        &self.options
    }

    /// Total evolution time.
    pub fn end_time(&self) -> f64 {
        self.horizon
            .unwrap_or_else(|| self.hamiltonian.schedule().horizon())
    }

    /// Evolve the uniform superposition over [0, end_time].
    pub fn run(&self) -> SimResult<Trajectory> {
        let psi0 = uniform_superposition(self.hamiltonian.num_qubits())?;
        let t_end = self.end_time();
        debug!(
            n_qubits = self.hamiltonian.num_qubits(),
            t_end,
            max_step = self.options.max_step,
            "starting adiabatic evolution"
        );

        let traj = evolve_with(
            |t, psi| self.hamiltonian.rhs(t, psi),
            (0.0, t_end),
            &psi0,
            &self.options,
        )?;

        info!(
            samples = traj.len(),
            rejected = traj.stats().rejected,
            "adiabatic evolution complete"
        );
        Ok(traj)
    }
}
