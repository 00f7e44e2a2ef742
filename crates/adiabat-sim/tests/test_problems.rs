//! Tests for the Ising and k-SAT problem generators.

use adiabat_sim::diagnostics::spectrum;
use adiabat_sim::error::SimError;
use adiabat_sim::hamiltonian::{PauliString, build};
use adiabat_sim::pauli::PauliOp;
use adiabat_sim::problems::{
    Clause, Instance, basis_assignment, ising, random_clause, random_instance, sat_hamiltonian,
    transverse_field,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Ising
// ---------------------------------------------------------------------------

#[test]
fn ising_term_counts() {
    for n in 3..=6 {
        let sym = ising(n, 1.0, 0.5).unwrap();
        assert_eq!(sym.n_terms(), 2 * n, "n = {n}");
        let sym = ising(n, 1.0, 0.0).unwrap();
        assert_eq!(sym.n_terms(), n, "n = {n}");
    }
}

#[test]
fn ising_couplings_are_nearest_neighbours_on_a_ring() {
    let n = 5;
    let sym = ising(n, -1.0, 0.0).unwrap();
    for (term, coeff) in sym.terms() {
        assert_eq!(coeff, -1.0);
        let ps: PauliString = term.parse().unwrap();
        let support = ps.support();
        assert_eq!(support.len(), 2, "{term}");
        assert!(ps.ops().iter().all(|op| matches!(op, PauliOp::I | PauliOp::Z)));
        let distance = support[1] - support[0];
        assert!(distance == 1 || distance == n - 1, "{term}");
    }
}

#[test]
fn ising_two_sites_is_doubled_zz() {
    let sym = ising(2, 1.0, 0.0).unwrap();
    assert_eq!(sym.n_terms(), 1);
    assert_eq!(sym.coefficient("ZZ"), Some(2.0));

    let h = build(&sym, 2).unwrap();
    assert_eq!(h.diagonal(), vec![2.0, -2.0, -2.0, 2.0]);
}

#[test]
fn ising_rejects_single_site() {
    assert!(matches!(ising(1, 1.0, 0.0), Err(SimError::InvalidArgument(_))));
}

#[test]
fn transverse_field_has_one_x_per_site() {
    let sym = transverse_field(3, -1.0).unwrap();
    assert_eq!(sym.n_terms(), 3);
    for term in ["XII", "IXI", "IIX"] {
        assert_eq!(sym.coefficient(term), Some(-1.0));
    }
}

#[test]
fn transverse_field_ground_state_is_uniform() {
    let h = build(&transverse_field(3, -1.0).unwrap(), 3).unwrap();
    let spec = spectrum(&h).unwrap();
    assert!((spec.ground_energy() + 3.0).abs() < 1e-10);
    assert_eq!(spec.ground_degeneracy(), 1);
    let uniform = adiabat_sim::evolution::uniform_superposition(3).unwrap();
    assert!((spec.ground_space_overlap(&uniform).unwrap() - 1.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Clauses and instances
// ---------------------------------------------------------------------------

#[test]
fn clause_validation() {
    assert!(Clause::new(vec![1, -2, 3], 3).is_ok());
    assert!(matches!(
        Clause::new(vec![], 3),
        Err(SimError::InvalidClause { .. })
    ));
    assert!(matches!(
        Clause::new(vec![0, 1], 3),
        Err(SimError::InvalidClause { .. })
    ));
    assert!(matches!(
        Clause::new(vec![1, 4], 3),
        Err(SimError::InvalidClause { .. })
    ));
    assert!(matches!(
        Clause::new(vec![2, -2], 3),
        Err(SimError::InvalidClause { .. })
    ));
}

#[test]
fn clause_satisfaction_and_display() {
    let clause = Clause::new(vec![1, -2], 2).unwrap();
    assert!(clause.is_satisfied_by(&[true, true]));
    assert!(clause.is_satisfied_by(&[false, false]));
    assert!(!clause.is_satisfied_by(&[false, true]));
    assert_eq!(clause.to_string(), "1 -2 0");
}

#[test]
fn basis_assignment_is_msb_first() {
    assert_eq!(basis_assignment(0b100, 3), vec![true, false, false]);
    assert_eq!(basis_assignment(0b011, 3), vec![false, true, true]);
}

#[test]
fn random_clause_has_distinct_variables() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let clause = random_clause(6, 3, &mut rng).unwrap();
        let mut vars: Vec<usize> = clause.variables().collect();
        vars.sort_unstable();
        vars.dedup();
        assert_eq!(vars.len(), 3);
        assert!(vars.iter().all(|&v| (1..=6).contains(&v)));
    }
}

#[test]
fn random_clause_rejects_too_many_literals() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        random_clause(2, 3, &mut rng),
        Err(SimError::TooManyLiterals {
            k: 3,
            num_variables: 2
        })
    ));
}

#[test]
fn random_instance_is_reproducible() {
    let a = random_instance(5, 8, 3, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = random_instance(5, 8, 3, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.num_clauses(), 8);
    assert!(a.clauses().iter().all(|c| c.len() == 3));
}

#[test]
fn instance_json_keeps_clause_literals() {
    let instance = Instance::from_literals(3, vec![vec![1, -3], vec![-2]]).unwrap();
    let json = serde_json::to_string(&instance).unwrap();
    assert_eq!(json, r#"{"num_variables":3,"clauses":[[1,-3],[-2]]}"#);
    let back: Instance = serde_json::from_str(&json).unwrap();
    assert_eq!(back, instance);
}

#[test]
fn instance_json_is_validated() {
    for json in [
        r#"{"num_variables":2,"clauses":[[1,0]]}"#,
        r#"{"num_variables":2,"clauses":[[1,3]]}"#,
        r#"{"num_variables":2,"clauses":[[-2,2]]}"#,
        r#"{"num_variables":2,"clauses":[[]]}"#,
    ] {
        assert!(serde_json::from_str::<Instance>(json).is_err(), "{json}");
    }
    assert!(serde_json::from_str::<Clause>("[2, 0, -1]").is_err());
    assert!(serde_json::from_str::<Clause>("[]").is_err());

    let clause: Clause = serde_json::from_str("[4, -1]").unwrap();
    assert_eq!(clause.literals(), &[4, -1]);
}

// ---------------------------------------------------------------------------
// SAT Hamiltonian
// ---------------------------------------------------------------------------

#[test]
fn sat_hamiltonian_counts_unsatisfied_clauses() {
    let instance = random_instance(4, 6, 3, &mut StdRng::seed_from_u64(7)).unwrap();
    let h = sat_hamiltonian(&instance, 4, PauliOp::Z).unwrap();
    assert!(h.is_hermitian(1e-12));

    for (index, value) in h.diagonal().into_iter().enumerate() {
        let assignment = basis_assignment(index, 4);
        let expected = instance.count_unsatisfied(&assignment) as f64;
        assert!((value - expected).abs() < 1e-12, "index {index}");
    }
    // diagonal in the computational basis
    for ((i, j), z) in h.matrix().indexed_iter() {
        if i != j {
            assert!(z.norm() < 1e-12);
        }
    }
}

#[test]
fn satisfiable_instance_has_zero_ground_energy() {
    let instance = Instance::from_literals(4, vec![vec![1, 2, 3], vec![-1, 2, -4], vec![2, 3, 4]])
        .unwrap();
    assert!(instance.is_satisfiable());
    let h = sat_hamiltonian(&instance, 4, PauliOp::Z).unwrap();
    let spec = spectrum(&h).unwrap();
    assert!(spec.ground_energy().abs() < 1e-10);
    assert_eq!(
        spec.ground_degeneracy(),
        instance.satisfying_assignments().len()
    );
}

#[test]
fn unsatisfiable_instance_has_positive_ground_energy() {
    let instance = Instance::from_literals(1, vec![vec![1], vec![-1]]).unwrap();
    assert!(!instance.is_satisfiable());
    let h = sat_hamiltonian(&instance, 1, PauliOp::Z).unwrap();
    assert!((spectrum(&h).unwrap().ground_energy() - 1.0).abs() < 1e-10);
}

#[test]
fn sat_hamiltonian_in_x_basis_has_same_spectrum() {
    let instance = random_instance(3, 4, 2, &mut StdRng::seed_from_u64(1)).unwrap();
    let hz = spectrum(&sat_hamiltonian(&instance, 3, PauliOp::Z).unwrap()).unwrap();
    let hx = spectrum(&sat_hamiltonian(&instance, 3, PauliOp::X).unwrap()).unwrap();
    for (a, b) in hz.eigenvalues().iter().zip(hx.eigenvalues()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn sat_hamiltonian_rejects_identity_basis() {
    let instance = Instance::from_literals(2, vec![vec![1, 2]]).unwrap();
    assert!(sat_hamiltonian(&instance, 2, PauliOp::I).is_err());
}

#[test]
fn sat_hamiltonian_rejects_too_few_bits() {
    let instance = Instance::from_literals(3, vec![vec![1, 3]]).unwrap();
    assert!(matches!(
        sat_hamiltonian(&instance, 2, PauliOp::Z),
        Err(SimError::InvalidArgument(_))
    ));
}
