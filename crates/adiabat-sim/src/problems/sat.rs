//! Random k-SAT instances and their projector Hamiltonians.
//!
//! A clause (ℓ_1 ∨ … ∨ ℓ_k) is violated by exactly one assignment of its k
//! variables. Its penalty is the projector onto that assignment:
//!
//!   P_c = ⊗_{ℓ ∈ c} ½(I + sign(ℓ)·Z)_{|ℓ|-1}  ⊗  I elsewhere
//!
//! and the problem Hamiltonian is H = Σ_c P_c. In the computational basis
//! H is diagonal and counts violated clauses, so its ground energy is 0
//! exactly when the instance is satisfiable.
//!
//! Variable `v` (1-based) lives on site `v - 1`; site 0 is the most
//! significant bit of a basis index.

use std::fmt;

use ndarray::Array2;
use ndarray::linalg::kron;
use num_complex::Complex64;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{DenseHamiltonian, check_qubit_count};
use crate::pauli::{PauliOp, projector};

/// A disjunction of signed literals over distinct variables.
///
/// A positive literal `v` is true when variable `v` is 1; `-v` is true when
/// it is 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Clause {
    literals: Vec<i32>,
}

impl Clause {
    /// Validate and build a clause over variables `1..=num_variables`.
    pub fn new(literals: Vec<i32>, num_variables: usize) -> SimResult<Self> {
        if literals.is_empty() {
            return Err(SimError::InvalidClause {
                literals,
                reason: "clause is empty".into(),
            });
        }
        let mut seen = Vec::with_capacity(literals.len());
        for &lit in &literals {
            let var = lit.unsigned_abs() as usize;
            if lit == 0 || var > num_variables {
                return Err(SimError::InvalidClause {
                    reason: format!("literal {lit} outside 1..={num_variables}"),
                    literals: literals.clone(),
                });
            }
            if seen.contains(&var) {
                return Err(SimError::InvalidClause {
                    reason: format!("variable {var} appears twice"),
                    literals: literals.clone(),
                });
            }
            seen.push(var);
        }
        Ok(Self { literals })
    }

    /// The signed literals in draw order.
    pub fn literals(&self) -> &[i32] {
        &self.literals
    }

    /// Clause width k.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Always false for a validated clause.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// 1-based variable indices.
    pub fn variables(&self) -> impl Iterator<Item = usize> + '_ {
        self.literals.iter().map(|l| l.unsigned_abs() as usize)
    }

    /// Evaluate against an assignment given as one bool per variable
    /// (`assignment[v - 1]` is variable `v`).
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.literals.iter().any(|&lit| {
            let value = assignment
                .get(lit.unsigned_abs() as usize - 1)
                .copied()
                .unwrap_or(false);
            if lit > 0 { value } else { !value }
        })
    }
}

/// Checks everything except the variable bound, which the enclosing
/// [`Instance`] enforces.
impl TryFrom<Vec<i32>> for Clause {
    type Error = SimError;

    fn try_from(literals: Vec<i32>) -> SimResult<Self> {
        Self::new(literals, usize::MAX)
    }
}

impl From<Clause> for Vec<i32> {
    fn from(clause: Clause) -> Self {
        clause.literals
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.literals {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}

/// An ordered conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData")]
pub struct Instance {
    num_variables: usize,
    clauses: Vec<Clause>,
}

#[derive(Deserialize)]
struct InstanceData {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl TryFrom<InstanceData> for Instance {
    type Error = SimError;

    fn try_from(data: InstanceData) -> SimResult<Self> {
        Self::new(data.num_variables, data.clauses)
    }
}

impl Instance {
    /// Build an instance; every clause must fit `num_variables`.
    pub fn new(num_variables: usize, clauses: Vec<Clause>) -> SimResult<Self> {
        for clause in &clauses {
            if clause.variables().any(|v| v > num_variables) {
                return Err(SimError::InvalidClause {
                    literals: clause.literals.clone(),
                    reason: format!("variable outside 1..={num_variables}"),
                });
            }
        }
        Ok(Self {
            num_variables,
            clauses,
        })
    }

    /// Parse clauses from plain literal lists.
    pub fn from_literals(num_variables: usize, clauses: Vec<Vec<i32>>) -> SimResult<Self> {
        let clauses = clauses
            .into_iter()
            .map(|lits| Clause::new(lits, num_variables))
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Self {
            num_variables,
            clauses,
        })
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Clauses in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Number of clauses violated by `assignment`.
    pub fn count_unsatisfied(&self, assignment: &[bool]) -> usize {
        self.clauses
            .iter()
            .filter(|c| !c.is_satisfied_by(assignment))
            .count()
    }

    /// True if `assignment` satisfies every clause.
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.count_unsatisfied(assignment) == 0
    }

    /// Every satisfying assignment, by brute-force enumeration.
    ///
    /// Assignments are listed in basis-index order (variable 1 is the most
    /// significant bit).
    pub fn satisfying_assignments(&self) -> Vec<Vec<bool>> {
        let n = self.num_variables;
        (0..1usize << n)
            .map(|index| basis_assignment(index, n))
            .filter(|a| self.is_satisfied_by(a))
            .collect()
    }

    /// True if some assignment satisfies every clause.
    pub fn is_satisfiable(&self) -> bool {
        let n = self.num_variables;
        (0..1usize << n).any(|index| self.is_satisfied_by(&basis_assignment(index, n)))
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_variables, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Variable values encoded by basis state `index` on `n` sites.
pub fn basis_assignment(index: usize, n: usize) -> Vec<bool> {
    (0..n).map(|site| (index >> (n - 1 - site)) & 1 == 1).collect()
}

/// Draw one clause: `k` distinct variables uniformly without replacement,
/// each negated with probability ½.
pub fn random_clause<R: Rng + ?Sized>(
    num_variables: usize,
    k: usize,
    rng: &mut R,
) -> SimResult<Clause> {
    if k == 0 {
        return Err(SimError::InvalidArgument("clause width k must be ≥ 1".into()));
    }
    if k > num_variables {
        return Err(SimError::TooManyLiterals { k, num_variables });
    }
    let literals = index::sample(rng, num_variables, k)
        .into_iter()
        .map(|i| {
            let var = (i + 1) as i32;
            if rng.gen_bool(0.5) { -var } else { var }
        })
        .collect();
    Ok(Clause { literals })
}

/// Draw `num_clauses` independent clauses. Repeats are kept.
pub fn random_instance<R: Rng + ?Sized>(
    num_variables: usize,
    num_clauses: usize,
    k: usize,
    rng: &mut R,
) -> SimResult<Instance> {
    let clauses = (0..num_clauses)
        .map(|_| random_clause(num_variables, k, rng))
        .collect::<SimResult<Vec<_>>>()?;
    debug!(num_variables, num_clauses, k, "generated random k-SAT instance");
    Ok(Instance {
        num_variables,
        clauses,
    })
}

/// Sum of clause-violation projectors on `num_bits` sites.
///
/// `basis` selects the Pauli used in ½(I ± P); `Z` gives the usual
/// computational-basis encoding.
pub fn sat_hamiltonian(
    instance: &Instance,
    num_bits: usize,
    basis: PauliOp,
) -> SimResult<DenseHamiltonian> {
    check_qubit_count(num_bits)?;
    if instance.num_variables() > num_bits {
        return Err(SimError::InvalidArgument(format!(
            "instance has {} variables but only {num_bits} bits were requested",
            instance.num_variables()
        )));
    }
    let plus = projector(basis, 1)?;
    let minus = projector(basis, -1)?;
    let identity = PauliOp::I.matrix();

    let mut h = DenseHamiltonian::zeros(num_bits)?;
    for clause in instance.clauses() {
        let mut factors: Vec<&Array2<Complex64>> = vec![&identity; num_bits];
        for &lit in clause.literals() {
            let site = lit.unsigned_abs() as usize - 1;
            // positive literal is false on |0⟩ = ½(I + Z)
            factors[site] = if lit > 0 { &plus } else { &minus };
        }
        let term = factors
            .into_iter()
            .fold(Array2::from_elem((1, 1), Complex64::new(1.0, 0.0)), |acc, f| {
                kron(&acc, f)
            });
        h.add_assign_matrix(&term);
    }

    debug!(
        num_clauses = instance.num_clauses(),
        num_bits,
        basis = %basis,
        "built SAT projector Hamiltonian"
    );
    Ok(h)
}
