//! Problem Hamiltonians for adiabatic evolution.

pub mod ising;
pub mod sat;

pub use ising::{ising, transverse_field};
pub use sat::{
    Clause, Instance, basis_assignment, random_clause, random_instance, sat_hamiltonian,
};
