//! Error types for the sim crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while building Hamiltonians, integrating the Schrödinger
/// equation, or computing diagnostics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    // -- invalid arguments ---------------------------------------------------
    /// The schedule was evaluated before t = 0.
    #[error("schedule evaluated at negative time t = {0}")]
    NegativeTime(f64),

    /// Schedule rate must be finite and strictly positive.
    #[error("schedule rate must be finite and positive, got {0}")]
    InvalidRate(f64),

    /// A symbolic term does not have one label per site.
    #[error("term '{term}' has {found} labels but the Hamiltonian has {expected} sites")]
    TermLengthMismatch {
        /// The offending term string.
        term: String,
        /// Number of sites the builder was asked for.
        expected: usize,
        /// Number of labels found in the term.
        found: usize,
    },

    /// A label outside {I, X, Y, Z}.
    #[error("unrecognised Pauli label '{label}' in term '{term}'")]
    InvalidPauliLabel {
        /// The offending character.
        label: char,
        /// The term it appeared in.
        term: String,
    },

    /// A clause asked for more distinct variables than exist.
    #[error("clause needs {k} distinct variables but only {num_variables} are available")]
    TooManyLiterals {
        /// Requested clause width.
        k: usize,
        /// Variables available.
        num_variables: usize,
    },

    /// A clause literal is zero, out of range, or repeats a variable.
    #[error("invalid clause {literals:?}: {reason}")]
    InvalidClause {
        /// The literals as given.
        literals: Vec<i32>,
        /// What is wrong with them.
        reason: String,
    },

    /// Qubit count is zero or exceeds the dense-simulation limit.
    #[error("qubit count {n} outside supported range 1..={max}")]
    InvalidQubitCount {
        /// Requested count.
        n: usize,
        /// Largest supported count.
        max: usize,
    },

    /// Two operands have incompatible dimensions.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        found: usize,
    },

    /// Any other rejected parameter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- numerical failures --------------------------------------------------
    /// Step size collapsed below the floating-point resolution of t.
    #[error("integrator step size underflow at t = {t} (h = {h:e})")]
    StepSizeUnderflow {
        /// Time at which the solver gave up.
        t: f64,
        /// Last attempted step.
        h: f64,
    },

    /// Step budget exhausted before reaching the end of the time span.
    #[error("integrator exceeded {max_steps} steps at t = {t}")]
    MaxStepsExceeded {
        /// Time reached.
        t: f64,
        /// Configured step budget.
        max_steps: usize,
    },

    /// The state picked up NaN or infinite amplitudes.
    #[error("integrator produced a non-finite state at t = {0}")]
    NonFiniteState(f64),

    /// A matrix that should be Hermitian is not.
    #[error("matrix is not Hermitian (max |H - H†| = {max_deviation:e})")]
    NonHermitian {
        /// Largest entrywise deviation from Hermiticity.
        max_deviation: f64,
    },

    /// The eigensolver did not converge.
    #[error("Hermitian eigendecomposition failed to converge (dim = {dim})")]
    EigenDecompositionFailed {
        /// Matrix dimension.
        dim: usize,
    },

    // -- configuration -------------------------------------------------------
    /// Run configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SimError {
    /// True for the numerical-failure family (integrator and eigensolver),
    /// false for rejected inputs.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            SimError::StepSizeUnderflow { .. }
                | SimError::MaxStepsExceeded { .. }
                | SimError::NonFiniteState(_)
                | SimError::NonHermitian { .. }
                | SimError::EigenDecompositionFailed { .. }
        )
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
