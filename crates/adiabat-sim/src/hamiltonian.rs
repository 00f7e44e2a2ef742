//! Symbolic and dense Hamiltonians.
//!
//! A symbolic Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · (P_k,0 ⊗ P_k,1 ⊗ … ⊗ P_k,n-1)
//!
//! written as a map from term strings such as `"ZZI"` to real coefficients.
//! [`build`] expands it into a dense `2^n × 2^n` complex matrix. Site 0 is the
//! leftmost Kronecker factor, i.e. the most-significant bit of a basis index.
//!
//! # Example
//!
//! ```rust
//! use adiabat_sim::hamiltonian::{SymbolicHamiltonian, build};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let mut sym = SymbolicHamiltonian::new();
//! sym.add_term("ZZ", -1.0);
//! sym.add_term("XI", 0.5);
//! let h = build(&sym, 2).unwrap();
//! assert_eq!(h.dim(), 4);
//! assert!(h.is_hermitian(1e-12));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ndarray::linalg::kron;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::pauli::PauliOp;

/// Largest qubit count accepted for dense construction (4^n complex entries).
pub const MAX_DENSE_QUBITS: usize = 14;

/// A tensor product of Pauli operators, one per site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<PauliOp>,
}

impl PauliString {
    /// Construct from per-site operators.
    pub fn from_ops(ops: impl IntoIterator<Item = PauliOp>) -> Self {
        Self {
            ops: ops.into_iter().collect(),
        }
    }

    /// All-identity string on `n` sites.
    pub fn identity(n: usize) -> Self {
        Self {
            ops: vec![PauliOp::I; n],
        }
    }

    /// `op` on `site`, identity elsewhere.
    pub fn single(n: usize, site: usize, op: PauliOp) -> Self {
        let mut s = Self::identity(n);
        if site < n {
            s.ops[site] = op;
        }
        s
    }

    /// Per-site operators in site order.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True for a zero-site string.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.ops.iter().filter(|op| !op.is_identity()).count()
    }

    /// Sites carrying a non-identity factor, ascending.
    pub fn support(&self) -> Vec<usize> {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| !op.is_identity())
            .map(|(i, _)| i)
            .collect()
    }

    /// Cyclically shift every factor `k` sites to the right.
    #[must_use]
    pub fn rotate_right(&self, k: usize) -> Self {
        let mut ops = self.ops.clone();
        if !ops.is_empty() {
            let k = k % ops.len();
            ops.rotate_right(k);
        }
        Self { ops }
    }

    /// Dense matrix ⊗_i P_i.
    pub fn matrix(&self) -> Array2<Complex64> {
        self.ops
            .iter()
            .fold(Array2::from_elem((1, 1), Complex64::new(1.0, 0.0)), |acc, op| {
                kron(&acc, &op.matrix())
            })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl FromStr for PauliString {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| {
                PauliOp::from_label(c).ok_or_else(|| SimError::InvalidPauliLabel {
                    label: c,
                    term: s.to_string(),
                })
            })
            .collect::<SimResult<Vec<_>>>()
            .map(|ops| Self { ops })
    }
}

/// A sum of Pauli strings keyed by their textual form.
///
/// Adding a term whose key already exists accumulates the coefficient.
/// Keys are kept verbatim; they are only checked by [`build`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolicHamiltonian {
    terms: BTreeMap<String, f64>,
}

impl SymbolicHamiltonian {
    /// Create an empty Hamiltonian.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coeff · term`, accumulating onto an existing identical term.
    pub fn add_term(&mut self, term: impl Into<String>, coeff: f64) {
        *self.terms.entry(term.into()).or_insert(0.0) += coeff;
    }

    /// Coefficient of `term`, if present.
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.terms.get(term).copied()
    }

    /// Terms in lexicographic key order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Σ |c_k|, an upper bound on the spectral norm.
    pub fn lambda(&self) -> f64 {
        self.terms.values().map(|c| c.abs()).sum()
    }

    /// Add every term of `other` into `self`.
    pub fn merge(&mut self, other: &SymbolicHamiltonian) {
        for (term, coeff) in other.terms() {
            self.add_term(term, coeff);
        }
    }

    /// Copy with every coefficient multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .collect(),
        }
    }
}

impl FromIterator<(String, f64)> for SymbolicHamiltonian {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut h = Self::new();
        h.extend(iter);
        h
    }
}

impl Extend<(String, f64)> for SymbolicHamiltonian {
    fn extend<T: IntoIterator<Item = (String, f64)>>(&mut self, iter: T) {
        for (term, coeff) in iter {
            self.add_term(term, coeff);
        }
    }
}

impl fmt::Display for SymbolicHamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hamiltonian ({} terms):", self.n_terms())?;
        for (term, coeff) in self.terms() {
            writeln!(f, "  {coeff:+.4} {term}")?;
        }
        Ok(())
    }
}

/// Dense `2^n × 2^n` complex Hamiltonian.
///
/// Immutable once built; combinators return new matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseHamiltonian {
    num_qubits: usize,
    matrix: Array2<Complex64>,
}

impl DenseHamiltonian {
    /// The zero operator on `n` qubits.
    pub fn zeros(n: usize) -> SimResult<Self> {
        check_qubit_count(n)?;
        let dim = 1usize << n;
        Ok(Self {
            num_qubits: n,
            matrix: Array2::zeros((dim, dim)),
        })
    }

    /// Wrap an existing matrix. It must be square with a power-of-two side.
    pub fn from_matrix(matrix: Array2<Complex64>) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SimError::DimensionMismatch {
                expected: rows,
                found: cols,
            });
        }
        if !rows.is_power_of_two() {
            return Err(SimError::InvalidArgument(format!(
                "matrix side {rows} is not a power of two"
            )));
        }
        let num_qubits = rows.trailing_zeros() as usize;
        check_qubit_count(num_qubits)?;
        Ok(Self { num_qubits, matrix })
    }

    /// Number of qubits (sites).
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension 2^n.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Consume and return the underlying matrix.
    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// H·ψ.
    pub fn apply(&self, state: &Array1<Complex64>) -> SimResult<Array1<Complex64>> {
        self.check_state(state)?;
        Ok(self.matrix.dot(state))
    }

    /// ⟨ψ|H|ψ⟩ without normalisation.
    pub fn expectation(&self, state: &Array1<Complex64>) -> SimResult<Complex64> {
        let h_psi = self.apply(state)?;
        Ok(state
            .iter()
            .zip(h_psi.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// max_ij |H_ij − conj(H_ji)|.
    pub fn max_hermitian_deviation(&self) -> f64 {
        let m = &self.matrix;
        let dim = self.dim();
        let mut worst = 0.0f64;
        for i in 0..dim {
            for j in i..dim {
                worst = worst.max((m[[i, j]] - m[[j, i]].conj()).norm());
            }
        }
        worst
    }

    /// True if every entry agrees with its conjugate transpose within `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.max_hermitian_deviation() <= tol
    }

    /// `factor · H`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            num_qubits: self.num_qubits,
            matrix: self.matrix.mapv(|z| z * factor),
        }
    }

    /// `a·self + b·other`.
    pub fn linear_combination(&self, a: f64, other: &Self, b: f64) -> SimResult<Self> {
        if self.dim() != other.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                found: other.dim(),
            });
        }
        let mut matrix = self.matrix.mapv(|z| z * a);
        matrix.scaled_add(Complex64::new(b, 0.0), &other.matrix);
        Ok(Self {
            num_qubits: self.num_qubits,
            matrix,
        })
    }

    /// Diagonal entries as real numbers (imaginary parts dropped).
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diag().iter().map(|z| z.re).collect()
    }

    pub(crate) fn check_state(&self, state: &Array1<Complex64>) -> SimResult<()> {
        if state.len() != self.dim() {
            return Err(SimError::DimensionMismatch {
                expected: self.dim(),
                found: state.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn add_assign_matrix(&mut self, m: &Array2<Complex64>) {
        self.matrix += m;
    }
}

/// Expand a symbolic Hamiltonian on `n` sites into a dense matrix.
///
/// Every term must have exactly `n` labels from {I, X, Y, Z}.
pub fn build(symbolic: &SymbolicHamiltonian, n: usize) -> SimResult<DenseHamiltonian> {
    let mut h = DenseHamiltonian::zeros(n)?;
    debug!(n_terms = symbolic.n_terms(), n, "building dense Hamiltonian");

    for (term, coeff) in symbolic.terms() {
        let found = term.chars().count();
        if found != n {
            return Err(SimError::TermLengthMismatch {
                term: term.to_string(),
                expected: n,
                found,
            });
        }
        let pauli: PauliString = term.parse()?;
        if coeff == 0.0 {
            continue;
        }
        let mut product = pauli.matrix();
        product.mapv_inplace(|z| z * coeff);
        h.add_assign_matrix(&product);
    }

    Ok(h)
}

pub(crate) fn check_qubit_count(n: usize) -> SimResult<()> {
    if n == 0 || n > MAX_DENSE_QUBITS {
        return Err(SimError::InvalidQubitCount {
            n,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}
