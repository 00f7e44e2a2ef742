//! Energy diagnostics along a trajectory.
//!
//! For every sample (t, ψ) two numbers are compared:
//!
//! - the expectation energy  E(t)  = Re ⟨ψ|H(s(t))|ψ⟩
//! - the ground energy       E₀(t) = λ_min(H(s(t)))
//!
//! The ground energy comes from a full Hermitian eigendecomposition, which
//! also yields the gap above the (possibly degenerate) ground space and the
//! population ψ keeps in that space.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::generator::InterpolatedHamiltonian;
use crate::hamiltonian::DenseHamiltonian;
use crate::ode::Trajectory;
use crate::schedule::Schedule;

/// Entrywise tolerance for the Hermiticity check before diagonalisation.
pub const HERMITIAN_TOL: f64 = 1e-9;

/// Relative width of the band counted as the ground space.
pub const DEGENERACY_TOL: f64 = 1e-8;

/// Imaginary part of ⟨ψ|H|ψ⟩ tolerated before a warning, relative to |E|.
const IMAG_TOL: f64 = 1e-8;

/// Eigenvalues (ascending) and matching eigenvectors (columns).
#[derive(Debug, Clone)]
pub struct Spectrum {
    eigenvalues: Vec<f64>,
    eigenvectors: Array2<Complex64>,
}

impl Spectrum {
    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, ordered like [`Spectrum::eigenvalues`].
    pub fn eigenvectors(&self) -> &Array2<Complex64> {
        &self.eigenvectors
    }

    /// Smallest eigenvalue.
    pub fn ground_energy(&self) -> f64 {
        self.eigenvalues[0]
    }

    /// Number of eigenvalues within the degeneracy band of the minimum.
    pub fn ground_degeneracy(&self) -> usize {
        let e0 = self.ground_energy();
        let band = DEGENERACY_TOL * e0.abs().max(1.0);
        self.eigenvalues
            .iter()
            .take_while(|&&e| e - e0 <= band)
            .count()
    }

    /// Distance from the ground space to the next level, if there is one.
    pub fn gap(&self) -> Option<f64> {
        self.eigenvalues
            .get(self.ground_degeneracy())
            .map(|e| e - self.ground_energy())
    }

    /// Σ_{v in ground space} |⟨v|ψ⟩|².
    pub fn ground_space_overlap(&self, state: &Array1<Complex64>) -> SimResult<f64> {
        if state.len() != self.eigenvalues.len() {
            return Err(SimError::DimensionMismatch {
                expected: self.eigenvalues.len(),
                found: state.len(),
            });
        }
        Ok((0..self.ground_degeneracy())
            .map(|k| {
                self.eigenvectors
                    .column(k)
                    .iter()
                    .zip(state.iter())
                    .map(|(v, psi)| v.conj() * psi)
                    .sum::<Complex64>()
                    .norm_sqr()
            })
            .sum())
    }
}

/// Full eigendecomposition of a Hermitian Hamiltonian.
///
/// Fails with [`SimError::NonHermitian`] if the matrix is not Hermitian
/// within [`HERMITIAN_TOL`], and with [`SimError::EigenDecompositionFailed`]
/// if the solver does not converge.
pub fn spectrum(h: &DenseHamiltonian) -> SimResult<Spectrum> {
    let max_deviation = h.max_hermitian_deviation();
    if max_deviation > HERMITIAN_TOL {
        return Err(SimError::NonHermitian { max_deviation });
    }

    let dim = h.dim();
    let m = h.matrix();
    let dense = DMatrix::from_fn(dim, dim, |i, j| m[[i, j]]);
    let eig = SymmetricEigen::try_new(dense, f64::EPSILON, 1000 * dim)
        .ok_or(SimError::EigenDecompositionFailed { dim })?;

    let mut order: Vec<usize> = (0..dim).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

    let eigenvalues = order.iter().map(|&k| eig.eigenvalues[k]).collect();
    let eigenvectors =
        Array2::from_shape_fn((dim, dim), |(i, col)| eig.eigenvectors[(i, order[col])]);
    Ok(Spectrum {
        eigenvalues,
        eigenvectors,
    })
}

/// Re ⟨ψ|H(s(t))|ψ⟩.
pub fn energy<S: Schedule>(
    generator: &InterpolatedHamiltonian<S>,
    t: f64,
    state: &Array1<Complex64>,
) -> SimResult<f64> {
    expectation_energy(&generator.at_time(t)?, t, state)
}

/// λ_min(H(s(t))).
pub fn ground_energy<S: Schedule>(
    generator: &InterpolatedHamiltonian<S>,
    t: f64,
) -> SimResult<f64> {
    Ok(spectrum(&generator.at_time(t)?)?.ground_energy())
}

fn expectation_energy(h: &DenseHamiltonian, t: f64, state: &Array1<Complex64>) -> SimResult<f64> {
    let e = h.expectation(state)?;
    if e.im.abs() > IMAG_TOL * e.re.abs().max(1.0) {
        warn!(
            t,
            re = e.re,
            im = e.im,
            "energy expectation has a non-negligible imaginary part"
        );
    }
    Ok(e.re)
}

/// Diagnostics for one trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSample {
    /// Evolution time.
    pub time: f64,
    /// Schedule value s(t).
    pub s: f64,
    /// Re ⟨ψ|H|ψ⟩.
    pub energy: f64,
    /// Smallest eigenvalue of H.
    pub ground_energy: f64,
    /// Gap above the ground space, if H is not a multiple of the identity.
    pub gap: Option<f64>,
    /// Population of ψ in the ground space.
    pub ground_overlap: f64,
    /// ‖ψ‖, drifts from 1 only through integrator error.
    pub norm: f64,
}

impl DiagnosticSample {
    /// E(t) − E₀(t); zero when ψ sits in the ground space.
    pub fn residual(&self) -> f64 {
        self.energy - self.ground_energy
    }
}

/// Aligned diagnostics for a whole trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyTrace {
    samples: Vec<DiagnosticSample>,
}

impl EnergyTrace {
    /// All samples in time order.
    pub fn samples(&self) -> &[DiagnosticSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample times.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Expectation energies, aligned with [`EnergyTrace::times`].
    pub fn energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy).collect()
    }

    /// Ground energies, aligned with [`EnergyTrace::times`].
    pub fn ground_energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ground_energy).collect()
    }

    /// The last sample.
    pub fn last(&self) -> Option<&DiagnosticSample> {
        self.samples.last()
    }

    /// Energy above the ground state at the final time.
    pub fn final_residual(&self) -> Option<f64> {
        self.last().map(DiagnosticSample::residual)
    }

    /// Smallest gap seen along the trajectory.
    pub fn min_gap(&self) -> Option<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.gap)
            .min_by(f64::total_cmp)
    }

    /// Largest deviation of ‖ψ‖ from 1.
    pub fn max_norm_drift(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| (s.norm - 1.0).abs())
            .fold(0.0, f64::max)
    }
}

/// Diagnose one sample.
pub fn diagnose<S: Schedule>(
    generator: &InterpolatedHamiltonian<S>,
    t: f64,
    state: &Array1<Complex64>,
) -> SimResult<DiagnosticSample> {
    let s = generator.schedule().value(t)?;
    let h = generator.at(s)?;
    let energy = expectation_energy(&h, t, state)?;
    let spec = spectrum(&h)?;
    Ok(DiagnosticSample {
        time: t,
        s,
        energy,
        ground_energy: spec.ground_energy(),
        gap: spec.gap(),
        ground_overlap: spec.ground_space_overlap(state)?,
        norm: state.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt(),
    })
}

/// Diagnose every sample of `trajectory`.
pub fn analyze<S: Schedule>(
    generator: &InterpolatedHamiltonian<S>,
    trajectory: &Trajectory,
) -> SimResult<EnergyTrace> {
    analyze_with(generator, trajectory, |_| {})
}

/// [`analyze`], calling `on_sample` after each sample is diagnosed.
pub fn analyze_with<S, F>(
    generator: &InterpolatedHamiltonian<S>,
    trajectory: &Trajectory,
    mut on_sample: F,
) -> SimResult<EnergyTrace>
where
    S: Schedule,
    F: FnMut(&DiagnosticSample),
{
    let mut samples = Vec::with_capacity(trajectory.len());
    for (t, psi) in trajectory.iter() {
        let sample = diagnose(generator, t, psi)?;
        on_sample(&sample);
        samples.push(sample);
    }
    debug!(samples = samples.len(), "diagnostics complete");
    Ok(EnergyTrace { samples })
}
