//! Tests for Pauli strings and the dense Hamiltonian builder.

use adiabat_sim::error::SimError;
use adiabat_sim::hamiltonian::{DenseHamiltonian, PauliString, SymbolicHamiltonian, build};
use adiabat_sim::pauli::PauliOp;
use ndarray::linalg::kron;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

fn assert_close(a: &Array2<Complex64>, b: &Array2<Complex64>) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).norm() < 1e-12, "{x} != {y}");
    }
}

// ---------------------------------------------------------------------------
// PauliString
// ---------------------------------------------------------------------------

#[test]
fn pauli_string_parses_and_displays() {
    let ps: PauliString = "XIZY".parse().unwrap();
    assert_eq!(ps.len(), 4);
    assert_eq!(ps.weight(), 3);
    assert_eq!(ps.support(), vec![0, 2, 3]);
    assert_eq!(ps.to_string(), "XIZY");
}

#[test]
fn pauli_string_rejects_bad_label() {
    let err = "XQ".parse::<PauliString>().unwrap_err();
    assert!(matches!(err, SimError::InvalidPauliLabel { label: 'Q', .. }));
}

#[test]
fn pauli_string_rotation_is_cyclic() {
    let ps: PauliString = "ZZII".parse().unwrap();
    assert_eq!(ps.rotate_right(1).to_string(), "IZZI");
    assert_eq!(ps.rotate_right(3).to_string(), "ZIIZ");
    assert_eq!(ps.rotate_right(4), ps);
}

#[test]
fn single_site_string() {
    let ps = PauliString::single(3, 1, PauliOp::X);
    assert_eq!(ps.to_string(), "IXI");
    assert_eq!(PauliString::identity(3).weight(), 0);
}

// ---------------------------------------------------------------------------
// SymbolicHamiltonian
// ---------------------------------------------------------------------------

#[test]
fn duplicate_terms_accumulate() {
    let mut h = SymbolicHamiltonian::new();
    h.add_term("ZZ", 1.0);
    h.add_term("ZZ", 0.5);
    assert_eq!(h.n_terms(), 1);
    assert_eq!(h.coefficient("ZZ"), Some(1.5));
}

#[test]
fn lambda_is_sum_of_abs_coefficients() {
    let h: SymbolicHamiltonian = [("XX".to_string(), -2.0), ("ZI".to_string(), 0.5)]
        .into_iter()
        .collect();
    assert!((h.lambda() - 2.5).abs() < 1e-12);
    assert!((h.scaled(2.0).lambda() - 5.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn single_z_term_matches_kron() {
    for n in 1..=4 {
        let term = format!("Z{}", "I".repeat(n - 1));
        let mut sym = SymbolicHamiltonian::new();
        sym.add_term(term, 0.7);
        let h = build(&sym, n).unwrap();

        let mut expected = PauliOp::Z.matrix();
        for _ in 1..n {
            expected = kron(&expected, &PauliOp::I.matrix());
        }
        expected.mapv_inplace(|z| z * 0.7);
        assert_close(h.matrix(), &expected);
    }
}

#[test]
fn site_zero_is_most_significant_bit() {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term("ZI", 1.0);
    let h = build(&sym, 2).unwrap();
    // |00⟩, |01⟩ → +1 ; |10⟩, |11⟩ → −1
    assert_eq!(h.diagonal(), vec![1.0, 1.0, -1.0, -1.0]);
}

#[test]
fn build_is_hermitian_with_y_terms() {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term("XY", 0.3);
    sym.add_term("YZ", -1.1);
    sym.add_term("YY", 0.25);
    let h = build(&sym, 2).unwrap();
    assert!(h.is_hermitian(1e-12));
}

#[test]
fn build_rejects_wrong_length() {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term("ZZZ", 1.0);
    let err = build(&sym, 2).unwrap_err();
    assert!(matches!(
        err,
        SimError::TermLengthMismatch {
            expected: 2,
            found: 3,
            ..
        }
    ));
}

#[test]
fn build_rejects_bad_label() {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term("ZA", 1.0);
    assert!(matches!(
        build(&sym, 2),
        Err(SimError::InvalidPauliLabel { label: 'A', .. })
    ));
}

#[test]
fn build_rejects_zero_qubits() {
    assert!(matches!(
        build(&SymbolicHamiltonian::new(), 0),
        Err(SimError::InvalidQubitCount { n: 0, .. })
    ));
}

#[test]
fn empty_hamiltonian_is_zero() {
    let h = build(&SymbolicHamiltonian::new(), 2).unwrap();
    assert!(h.matrix().iter().all(|z| z.norm() == 0.0));
}

// ---------------------------------------------------------------------------
// DenseHamiltonian
// ---------------------------------------------------------------------------

#[test]
fn from_matrix_requires_power_of_two() {
    let m = Array2::<Complex64>::zeros((3, 3));
    assert!(DenseHamiltonian::from_matrix(m).is_err());
    let m = Array2::<Complex64>::zeros((4, 4));
    assert_eq!(DenseHamiltonian::from_matrix(m).unwrap().num_qubits(), 2);
}

#[test]
fn expectation_of_z_on_basis_states() {
    let mut sym = SymbolicHamiltonian::new();
    sym.add_term("Z", 1.0);
    let h = build(&sym, 1).unwrap();
    let up = Array1::from(vec![c(1.0), c(0.0)]);
    let down = Array1::from(vec![c(0.0), c(1.0)]);
    assert!((h.expectation(&up).unwrap().re - 1.0).abs() < 1e-12);
    assert!((h.expectation(&down).unwrap().re + 1.0).abs() < 1e-12);
}

#[test]
fn apply_rejects_wrong_dimension() {
    let h = DenseHamiltonian::zeros(2).unwrap();
    let psi = Array1::from(vec![c(1.0), c(0.0)]);
    assert!(matches!(
        h.apply(&psi),
        Err(SimError::DimensionMismatch {
            expected: 4,
            found: 2
        })
    ));
}

#[test]
fn linear_combination_mixes_matrices() {
    let mut a = SymbolicHamiltonian::new();
    a.add_term("X", 1.0);
    let mut b = SymbolicHamiltonian::new();
    b.add_term("Z", 1.0);
    let ha = build(&a, 1).unwrap();
    let hb = build(&b, 1).unwrap();
    let mixed = ha.linear_combination(0.25, &hb, 0.75).unwrap();
    assert!((mixed.matrix()[[0, 1]].re - 0.25).abs() < 1e-12);
    assert!((mixed.matrix()[[0, 0]].re - 0.75).abs() < 1e-12);
    assert!((mixed.matrix()[[1, 1]].re + 0.75).abs() < 1e-12);
}
