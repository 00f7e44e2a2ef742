//! Single-qubit Pauli operators and their exact 2×2 matrices.
//!
//! ```text
//!   I = | 1  0 |   X = | 0  1 |   Y = | 0 -i |   Z = | 1  0 |
//!       | 0  1 |       | 1  0 |       | i  0 |       | 0 -1 |
//! ```
//!
//! Matrices are produced on demand by [`PauliOp::matrix`]; there is no
//! shared table.

use std::fmt;

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I_UNIT: Complex64 = Complex64::new(0.0, 1.0);

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X (bit flip).
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z (phase flip); diagonal in the computational basis.
    Z,
}

impl PauliOp {
    /// All four operators in label order.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Parse a single label character (case-insensitive).
    pub fn from_label(label: char) -> Option<Self> {
        match label.to_ascii_uppercase() {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    /// The canonical upper-case label.
    pub fn label(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    /// True for the identity.
    pub fn is_identity(self) -> bool {
        self == PauliOp::I
    }

    /// The exact 2×2 matrix of this operator.
    pub fn matrix(self) -> Array2<Complex64> {
        match self {
            PauliOp::I => array![[ONE, ZERO], [ZERO, ONE]],
            PauliOp::X => array![[ZERO, ONE], [ONE, ZERO]],
            PauliOp::Y => array![[ZERO, -I_UNIT], [I_UNIT, ZERO]],
            PauliOp::Z => array![[ONE, ZERO], [ZERO, -ONE]],
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PauliOp {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_label(c).ok_or_else(|| SimError::InvalidPauliLabel {
                label: c,
                term: s.to_string(),
            }),
            _ => Err(SimError::InvalidArgument(format!(
                "expected a single Pauli label, got '{s}'"
            ))),
        }
    }
}

/// Rank-one projector ½(I + sign·P) for a non-identity Pauli `P`.
///
/// With `P = Z`, `sign = +1` selects |0⟩ and `sign = -1` selects |1⟩.
pub fn projector(op: PauliOp, sign: i32) -> SimResult<Array2<Complex64>> {
    if op.is_identity() {
        return Err(SimError::InvalidArgument(
            "projector basis must be a non-identity Pauli".into(),
        ));
    }
    if sign != 1 && sign != -1 {
        return Err(SimError::InvalidArgument(format!(
            "projector sign must be ±1, got {sign}"
        )));
    }
    let s = Complex64::new(f64::from(sign), 0.0);
    Ok((PauliOp::I.matrix() + op.matrix() * s) * Complex64::new(0.5, 0.0))
}
