//! Run configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with ADIABAT_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! ```yaml
//! problem:
//!   kind: ksat
//!   num_variables: 4
//!   num_clauses: 3
//!   k: 3
//!   seed: 7
//! schedule:
//!   rate: 0.05
//! integrator:
//!   max_step: 0.1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hamiltonian::MAX_DENSE_QUBITS;
use crate::ode::OdeOptions;
use crate::pauli::PauliOp;
use crate::schedule;

/// Complete configuration of one evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target problem.
    #[serde(default)]
    pub problem: ProblemConfig,

    /// Annealing schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// ODE solver settings.
    #[serde(default)]
    pub integrator: IntegratorConfig,

    /// Field strength h₀ of the initial Hamiltonian h₀ · Σ X_i. Must be
    /// negative so the uniform superposition is its ground state.
    #[serde(default = "default_initial_field")]
    pub initial_field: f64,

    /// Pauli used in the SAT clause projectors ½(I ± P).
    #[serde(default = "default_sat_basis")]
    pub sat_basis: PauliOp,
}

/// Problem selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProblemConfig {
    /// Transverse-field Ising ring.
    Ising {
        /// Number of sites.
        n: usize,
        /// Coupling J.
        #[serde(default = "default_coupling")]
        coupling: f64,
        /// Transverse field h.
        #[serde(default)]
        field: f64,
    },
    /// Random k-SAT.
    Ksat {
        /// Number of Boolean variables (one qubit each).
        num_variables: usize,
        /// Number of clauses.
        num_clauses: usize,
        /// Literals per clause.
        #[serde(default = "default_k")]
        k: usize,
        /// RNG seed; fresh entropy when absent.
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// Schedule settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Rate of the linear ramp; the run lasts 1/rate.
    #[serde(default = "default_rate")]
    pub rate: f64,
}

/// ODE solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Upper bound on the integrator step.
    #[serde(default = "default_max_step")]
    pub max_step: f64,

    /// Relative tolerance.
    #[serde(default = "default_rtol")]
    pub rtol: f64,

    /// Absolute tolerance.
    #[serde(default = "default_atol")]
    pub atol: f64,

    /// Step budget.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

// Default value functions
fn default_initial_field() -> f64 {
    -1.0
}

fn default_sat_basis() -> PauliOp {
    PauliOp::Z
}

fn default_coupling() -> f64 {
    1.0
}

fn default_k() -> usize {
    3
}

fn default_rate() -> f64 {
    0.1
}

fn default_max_step() -> f64 {
    0.1
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-9
}

fn default_max_steps() -> usize {
    1_000_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            problem: ProblemConfig::default(),
            schedule: ScheduleConfig::default(),
            integrator: IntegratorConfig::default(),
            initial_field: default_initial_field(),
            sat_basis: default_sat_basis(),
        }
    }
}

impl Default for ProblemConfig {
    fn default() -> Self {
        ProblemConfig::Ksat {
            num_variables: 4,
            num_clauses: 3,
            k: default_k(),
            seed: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
        }
    }
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_step: default_max_step(),
            rtol: default_rtol(),
            atol: default_atol(),
            max_steps: default_max_steps(),
        }
    }
}

impl ProblemConfig {
    /// Number of qubits the problem Hamiltonian acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            ProblemConfig::Ising { n, .. } => *n,
            ProblemConfig::Ksat { num_variables, .. } => *num_variables,
        }
    }

    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            ProblemConfig::Ising { .. } => "ising",
            ProblemConfig::Ksat { .. } => "ksat",
        }
    }
}

impl IntegratorConfig {
    /// Solver options for these settings.
    pub fn ode_options(&self) -> OdeOptions {
        OdeOptions {
            max_steps: self.max_steps,
            ..OdeOptions::default()
        }
        .with_max_step(self.max_step)
        .with_tolerances(self.rtol, self.atol)
    }
}

impl RunConfig {
    /// Total evolution time 1/rate.
    pub fn horizon(&self) -> f64 {
        schedule::horizon(self.schedule.rate)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialise to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => RunConfig::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ADIABAT_*` overrides looked up through `lookup`.
    ///
    /// Only variables that are present override; malformed values are
    /// rejected rather than ignored.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ADIABAT_RATE") {
            self.schedule.rate = parse_env("ADIABAT_RATE", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_MAX_STEP") {
            self.integrator.max_step = parse_env("ADIABAT_MAX_STEP", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_RTOL") {
            self.integrator.rtol = parse_env("ADIABAT_RTOL", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_ATOL") {
            self.integrator.atol = parse_env("ADIABAT_ATOL", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_INITIAL_FIELD") {
            self.initial_field = parse_env("ADIABAT_INITIAL_FIELD", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_SAT_BASIS") {
            self.sat_basis = parse_env("ADIABAT_SAT_BASIS", &v)?;
        }
        if let Some(v) = lookup("ADIABAT_SEED") {
            if let ProblemConfig::Ksat { seed, .. } = &mut self.problem {
                *seed = Some(parse_env("ADIABAT_SEED", &v)?);
            }
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.problem {
            ProblemConfig::Ising { n, coupling, field } => {
                if *n < 2 || *n > MAX_DENSE_QUBITS {
                    return Err(ConfigError::ValidationError(format!(
                        "Ising ring size must be in 2..={MAX_DENSE_QUBITS}, got {n}"
                    )));
                }
                if !coupling.is_finite() || !field.is_finite() {
                    return Err(ConfigError::ValidationError(
                        "Ising coupling and field must be finite".into(),
                    ));
                }
            }
            ProblemConfig::Ksat {
                num_variables,
                num_clauses,
                k,
                ..
            } => {
                if *num_variables == 0 || *num_variables > MAX_DENSE_QUBITS {
                    return Err(ConfigError::ValidationError(format!(
                        "num_variables must be in 1..={MAX_DENSE_QUBITS}, got {num_variables}"
                    )));
                }
                if *k == 0 || k > num_variables {
                    return Err(ConfigError::ValidationError(format!(
                        "clause width k must be in 1..={num_variables}, got {k}"
                    )));
                }
                if *num_clauses == 0 {
                    return Err(ConfigError::ValidationError(
                        "num_clauses must be at least 1".into(),
                    ));
                }
            }
        }

        if !self.schedule.rate.is_finite() || self.schedule.rate <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "schedule rate must be finite and positive, got {}",
                self.schedule.rate
            )));
        }
        if self.integrator.max_step.is_nan() || self.integrator.max_step <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "max_step must be positive, got {}",
                self.integrator.max_step
            )));
        }
        if self.integrator.rtol.is_nan()
            || self.integrator.rtol <= 0.0
            || self.integrator.atol.is_nan()
            || self.integrator.atol < 0.0
        {
            return Err(ConfigError::ValidationError(
                "tolerances must satisfy rtol > 0 and atol >= 0".into(),
            ));
        }
        if self.integrator.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "max_steps must be at least 1".into(),
            ));
        }
        if !self.initial_field.is_finite() || self.initial_field >= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "initial_field must be finite and negative, got {}",
                self.initial_field
            )));
        }
        if self.sat_basis.is_identity() {
            return Err(ConfigError::ValidationError(
                "sat_basis must be one of x, y, z".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
