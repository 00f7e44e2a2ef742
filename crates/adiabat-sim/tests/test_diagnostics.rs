//! Tests for spectra and energy diagnostics.

use adiabat_sim::diagnostics::{
    analyze, analyze_with, diagnose, energy, ground_energy, spectrum,
};
use adiabat_sim::error::SimError;
use adiabat_sim::evolution::{AdiabaticEvolution, uniform_superposition};
use adiabat_sim::generator::InterpolatedHamiltonian;
use adiabat_sim::hamiltonian::{DenseHamiltonian, SymbolicHamiltonian, build};
use adiabat_sim::problems::{ising, transverse_field};
use adiabat_sim::schedule::LinearSchedule;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;

fn single(term: &str, coeff: f64) -> DenseHamiltonian {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term(term, coeff);
    build(&sym, term.len()).unwrap()
}

fn ring(n: usize) -> InterpolatedHamiltonian<LinearSchedule> {
    let h0 = build(&transverse_field(n, -1.0).unwrap(), n).unwrap();
    let h1 = build(&ising(n, 1.0, 0.0).unwrap(), n).unwrap();
    InterpolatedHamiltonian::new(h0, h1, LinearSchedule::new(0.5).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// spectrum()
// ---------------------------------------------------------------------------

#[test]
fn spectrum_of_pauli_y() {
    let spec = spectrum(&single("Y", 1.0)).unwrap();
    assert!((spec.eigenvalues()[0] + 1.0).abs() < 1e-12);
    assert!((spec.eigenvalues()[1] - 1.0).abs() < 1e-12);
    assert_eq!(spec.ground_degeneracy(), 1);
    assert!((spec.gap().unwrap() - 2.0).abs() < 1e-12);

    // Y|v⟩ = −|v⟩ for the ground eigenvector
    let v: Array1<Complex64> = spec.eigenvectors().column(0).to_owned();
    let yv = single("Y", 1.0).apply(&v).unwrap();
    for (a, b) in yv.iter().zip(v.iter()) {
        assert!((a + b).norm() < 1e-10);
    }
}

#[test]
fn spectrum_is_sorted() {
    let h = build(&ising(4, 1.0, 0.4).unwrap(), 4).unwrap();
    let spec = spectrum(&h).unwrap();
    assert_eq!(spec.eigenvalues().len(), 16);
    assert!(spec.eigenvalues().windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn spectrum_of_two_site_ising() {
    let h = build(&ising(2, 1.0, 0.0).unwrap(), 2).unwrap();
    let spec = spectrum(&h).unwrap();
    assert!((spec.ground_energy() + 2.0).abs() < 1e-12);
    assert_eq!(spec.ground_degeneracy(), 2);
    assert!((spec.gap().unwrap() - 4.0).abs() < 1e-12);
}

#[test]
fn spectrum_of_identity_multiple_has_no_gap() {
    let spec = spectrum(&single("II", 3.0)).unwrap();
    assert_eq!(spec.ground_degeneracy(), 4);
    assert_eq!(spec.gap(), None);
}

#[test]
fn spectrum_rejects_non_hermitian() {
    let m: Array2<Complex64> = array![
        [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
    ];
    let h = DenseHamiltonian::from_matrix(m).unwrap();
    let err = spectrum(&h).unwrap_err();
    assert!(matches!(err, SimError::NonHermitian { .. }));
    assert!(err.is_numerical());
}

#[test]
fn ground_space_overlap_of_eigenvector_is_one() {
    let spec = spectrum(&single("X", -1.0)).unwrap();
    let plus = uniform_superposition(1).unwrap();
    assert!((spec.ground_space_overlap(&plus).unwrap() - 1.0).abs() < 1e-12);

    let zero = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);
    assert!((spec.ground_space_overlap(&zero).unwrap() - 0.5).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// energy() / ground_energy()
// ---------------------------------------------------------------------------

#[test]
fn initial_state_is_initial_ground_state() {
    let generator = ring(3);
    let psi = uniform_superposition(3).unwrap();
    let e = energy(&generator, 0.0, &psi).unwrap();
    let e0 = ground_energy(&generator, 0.0).unwrap();
    assert!((e + 3.0).abs() < 1e-12);
    assert!((e - e0).abs() < 1e-10);
}

#[test]
fn final_ground_energy_is_problem_ground_energy() {
    let generator = ring(4);
    // J = 1 ring of 4: antiferromagnetic ground state has energy −4
    let e0 = ground_energy(&generator, 2.0).unwrap();
    assert!((e0 + 4.0).abs() < 1e-10);
}

#[test]
fn energy_rejects_negative_time() {
    let generator = ring(2);
    let psi = uniform_superposition(2).unwrap();
    assert!(matches!(
        energy(&generator, -1.0, &psi),
        Err(SimError::NegativeTime(_))
    ));
}

#[test]
fn diagnose_reports_schedule_value() {
    let generator = ring(2);
    let psi = uniform_superposition(2).unwrap();
    let sample = diagnose(&generator, 1.0, &psi).unwrap();
    assert_eq!(sample.s, 0.5);
    assert!((sample.norm - 1.0).abs() < 1e-12);
    assert!(sample.residual() >= -1e-10);
}

// ---------------------------------------------------------------------------
// analyze()
// ---------------------------------------------------------------------------

#[test]
fn analyze_aligns_with_trajectory() {
    let generator = ring(3);
    let evol = AdiabaticEvolution::from_interpolated(generator).with_max_step(0.2);
    let traj = evol.run().unwrap();
    let trace = analyze(evol.hamiltonian(), &traj).unwrap();

    assert_eq!(trace.len(), traj.len());
    assert_eq!(trace.times(), traj.times().to_vec());
    assert_eq!(trace.energies().len(), trace.ground_energies().len());
    for sample in trace.samples() {
        // variational bound
        assert!(sample.energy >= sample.ground_energy - 1e-6);
    }
    assert!(trace.min_gap().unwrap() > 0.0);
}

#[test]
fn analyze_with_visits_every_sample() {
    let generator = ring(2);
    let evol = AdiabaticEvolution::from_interpolated(generator).with_max_step(0.25);
    let traj = evol.run().unwrap().sampled(3);
    let mut seen = 0;
    let trace = analyze_with(evol.hamiltonian(), &traj, |_| seen += 1).unwrap();
    assert_eq!(seen, trace.len());
    assert_eq!(trace.last().unwrap().time, 2.0);
}
