//! Transverse-field Ising model on a ring.
//!
//!   H = J · Σ_i Z_i Z_{i+1 mod n}  +  h · Σ_i X_i
//!
//! Terms are produced by cyclically rotating a template string, so the
//! coupling between site n-1 and site 0 comes for free. For `n = 2` both
//! rotations of `ZZ` are the same string and the coupling accumulates to 2J.

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{PauliString, SymbolicHamiltonian, check_qubit_count};
use crate::pauli::PauliOp;

/// Ising ring with nearest-neighbour coupling `j` and transverse field `h`.
///
/// Emits `n` coupling terms and, when `h != 0`, `n` field terms.
pub fn ising(n: usize, j: f64, h: f64) -> SimResult<SymbolicHamiltonian> {
    if n < 2 {
        return Err(SimError::InvalidArgument(format!(
            "Ising ring needs at least 2 sites, got {n}"
        )));
    }
    check_qubit_count(n)?;

    let mut template = PauliString::identity(n).ops().to_vec();
    template[0] = PauliOp::Z;
    template[1] = PauliOp::Z;
    let coupling = PauliString::from_ops(template);

    let mut sym = SymbolicHamiltonian::new();
    for k in 0..n {
        sym.add_term(coupling.rotate_right(k).to_string(), j);
    }
    if h != 0.0 {
        sym.merge(&transverse_field(n, h)?);
    }

    debug!(n, j, h, n_terms = sym.n_terms(), "generated Ising ring");
    Ok(sym)
}

/// Field-only Hamiltonian `h · Σ_i X_i`.
///
/// For `h < 0` its ground state is the uniform superposition.
pub fn transverse_field(n: usize, h: f64) -> SimResult<SymbolicHamiltonian> {
    check_qubit_count(n)?;
    let template = PauliString::single(n, 0, PauliOp::X);
    Ok((0..n)
        .map(|k| (template.rotate_right(k).to_string(), h))
        .collect())
}
