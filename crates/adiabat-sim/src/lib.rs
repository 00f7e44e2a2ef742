//! `adiabat-sim` — dense adiabatic-evolution simulator.
//!
//! Builds small (2^n × 2^n) Hamiltonians from Pauli strings, interpolates
//! between a transverse-field driver H₀ and a problem Hamiltonian H₁ with a
//! linear schedule, integrates the Schrödinger equation with an adaptive
//! Dormand–Prince solver, and compares the evolved energy with the
//! instantaneous ground energy.
//!
//! Problem families:
//!
//! - **Transverse-field Ising** rings (periodic ZZ coupling plus X field)
//! - **Random k-SAT** with clause-violation projector Hamiltonians
//!
//! # Quick start
//!
//! ```rust
//! use adiabat_sim::config::{ProblemConfig, RunConfig};
//! use adiabat_sim::run::run;
//!
//! let mut config = RunConfig::default();
//! config.problem = ProblemConfig::Ising { n: 2, coupling: 1.0, field: 0.0 };
//! config.schedule.rate = 0.5;
//!
//! let report = run(&config).unwrap();
//! assert_eq!(report.num_qubits, 2);
//! assert!(report.final_residual().unwrap() >= -1e-6);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evolution;
pub mod generator;
pub mod hamiltonian;
pub mod ode;
pub mod pauli;
pub mod problems;
pub mod run;
pub mod schedule;

pub use config::{ConfigError, RunConfig};
pub use diagnostics::{DiagnosticSample, EnergyTrace, Spectrum, analyze, spectrum};
pub use error::{SimError, SimResult};
pub use evolution::{AdiabaticEvolution, evolve, uniform_superposition};
pub use generator::{InterpolatedHamiltonian, instantaneous_hamiltonian};
pub use hamiltonian::{DenseHamiltonian, PauliString, SymbolicHamiltonian, build};
pub use ode::{IntegrationStats, OdeOptions, Trajectory};
pub use pauli::PauliOp;
pub use run::{RunReport, run};
pub use schedule::{LinearSchedule, Schedule, schedule};
