//! Time-dependent Hamiltonian H(s) = (1 − s)·H₀ + s·H₁.
//!
//! The Schrödinger right-hand side (ħ = 1) is
//!
//!   dψ/dt = −i · H(s(t)) · ψ
//!
//! and is evaluated as −i[(1 − s)·H₀ψ + s·H₁ψ] so the interpolated matrix is
//! never formed inside the integrator loop.

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::DenseHamiltonian;
use crate::schedule::Schedule;

const MINUS_I: Complex64 = Complex64::new(0.0, -1.0);

/// Convex interpolation (1 − s)·H₀ + s·H₁.
pub fn instantaneous_hamiltonian(
    h_initial: &DenseHamiltonian,
    h_final: &DenseHamiltonian,
    s: f64,
) -> SimResult<DenseHamiltonian> {
    h_initial.linear_combination(1.0 - s, h_final, s)
}

/// H₀, H₁ and the schedule that blends them.
#[derive(Debug, Clone)]
pub struct InterpolatedHamiltonian<S> {
    h_initial: DenseHamiltonian,
    h_final: DenseHamiltonian,
    schedule: S,
}

impl<S: Schedule> InterpolatedHamiltonian<S> {
    /// Both endpoints must act on the same number of qubits.
    pub fn new(
        h_initial: DenseHamiltonian,
        h_final: DenseHamiltonian,
        schedule: S,
    ) -> SimResult<Self> {
        if h_initial.dim() != h_final.dim() {
            return Err(SimError::DimensionMismatch {
                expected: h_initial.dim(),
                found: h_final.dim(),
            });
        }
        Ok(Self {
            h_initial,
            h_final,
            schedule,
        })
    }

    /// H₀.
    pub fn initial(&self) -> &DenseHamiltonian {
        &self.h_initial
    }

    /// H₁.
    pub fn target(&self) -> &DenseHamiltonian {
        &self.h_final
    }

    /// The schedule.
    pub fn schedule(&self) -> &S {
        &self.schedule
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.h_initial.num_qubits()
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.h_initial.dim()
    }

    /// H(s).
    pub fn at(&self, s: f64) -> SimResult<DenseHamiltonian> {
        instantaneous_hamiltonian(&self.h_initial, &self.h_final, s)
    }

    /// H(s(t)).
    pub fn at_time(&self, t: f64) -> SimResult<DenseHamiltonian> {
        self.at(self.schedule.value(t)?)
    }

    /// −i · H(s(t)) · ψ.
    pub fn rhs(&self, t: f64, state: &Array1<Complex64>) -> SimResult<Array1<Complex64>> {
        let s = self.schedule.value(t)?;
        let mut out = self.h_initial.apply(state)?;
        out *= Complex64::new(1.0 - s, 0.0);
        out.scaled_add(Complex64::new(s, 0.0), &self.h_final.apply(state)?);
        out *= MINUS_I;
        Ok(out)
    }
}
