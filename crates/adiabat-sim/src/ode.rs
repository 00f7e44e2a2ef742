//! Adaptive Dormand–Prince 5(4) integrator for complex state vectors.
//!
//! Solves dy/dt = f(t, y) on [t0, t1] with an embedded Runge–Kutta pair:
//! the 5th-order solution is propagated, the 4th-order one only estimates
//! the local error. Step sizes follow the usual controller
//!
//!   h_new = h · clamp(0.9 · err^(-1/5), 0.2, 10)
//!
//! where `err` is the RMS of |e_i| / (atol + rtol · max(|y_i|, |y_new_i|)).
//! Every accepted step is recorded, so the returned trajectory is sampled at
//! the integrator's own (uneven) times.
//!
//! # Reference
//! J. R. Dormand, P. J. Prince, "A family of embedded Runge-Kutta formulae",
//! J. Comp. Appl. Math. 6 (1980) 19–26.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

// Butcher tableau.
const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
/// 5th-order weights (also row 7 of the tableau, hence FSAL).
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];
/// B − B̂, the difference between the 5th- and 4th-order weights (k1..k7).
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Tolerances and limits for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdeOptions {
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Upper bound on the step size.
    pub max_step: f64,
    /// Initial step; chosen automatically when `None`.
    pub first_step: Option<f64>,
    /// Accepted + rejected step budget.
    pub max_steps: usize,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl OdeOptions {
    /// Replace the step-size bound.
    #[must_use]
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Replace both tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.rtol > 0.0 && self.atol >= 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "tolerances must satisfy rtol > 0, atol >= 0 (got rtol = {}, atol = {})",
                self.rtol, self.atol
            )));
        }
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "max_step must be positive, got {}",
                self.max_step
            )));
        }
        if let Some(h) = self.first_step {
            if !(h > 0.0 && h.is_finite()) {
                return Err(SimError::InvalidArgument(format!(
                    "first_step must be positive and finite, got {h}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArgument("max_steps must be ≥ 1".into()));
        }
        Ok(())
    }
}

/// Counters collected during integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStats {
    /// Accepted steps.
    pub accepted: usize,
    /// Rejected steps.
    pub rejected: usize,
    /// Right-hand-side evaluations.
    pub evaluations: usize,
}

/// Ordered (time, state) samples; times strictly increase.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<Array1<Complex64>>,
    stats: IntegrationStats,
}

impl Trajectory {
    fn start(t0: f64, y0: Array1<Complex64>) -> Self {
        Self {
            times: vec![t0],
            states: vec![y0],
            stats: IntegrationStats::default(),
        }
    }

    fn push(&mut self, t: f64, y: Array1<Complex64>) {
        self.times.push(t);
        self.states.push(y);
    }

    /// Sample times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sampled states, aligned with [`Trajectory::times`].
    pub fn states(&self) -> &[Array1<Complex64>] {
        &self.states
    }

    /// Number of samples (including the initial state).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Never true for a trajectory returned by the integrator.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// (time, state) pairs in increasing time.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Array1<Complex64>)> {
        self.times.iter().copied().zip(self.states.iter())
    }

    /// The last sample.
    pub fn final_state(&self) -> Option<(f64, &Array1<Complex64>)> {
        self.iter().last()
    }

    /// Integrator counters.
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Every `stride`-th sample, always keeping the first and last.
    #[must_use]
    pub fn sampled(&self, stride: usize) -> Self {
        let stride = stride.max(1);
        let last = self.len().saturating_sub(1);
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| i % stride == 0 || i == last)
            .collect();
        Self {
            times: keep.iter().map(|&i| self.times[i]).collect(),
            states: keep.iter().map(|&i| self.states[i].clone()).collect(),
            stats: self.stats,
        }
    }
}

/// Integrate `rhs` from `y0` over `t_span = (t0, t1)`, `t1 > t0`.
///
/// Any failure (step-size collapse, step budget, non-finite state) is an
/// error; partial trajectories are never returned.
pub fn integrate<F>(
    mut rhs: F,
    t_span: (f64, f64),
    y0: &Array1<Complex64>,
    options: &OdeOptions,
) -> SimResult<Trajectory>
where
    F: FnMut(f64, &Array1<Complex64>) -> SimResult<Array1<Complex64>>,
{
    options.validate()?;
    let (t0, t1) = t_span;
    if !(t0.is_finite() && t1.is_finite() && t1 > t0) {
        return Err(SimError::InvalidArgument(format!(
            "time span must satisfy t0 < t1 (got [{t0}, {t1}])"
        )));
    }
    if y0.iter().any(|z| !z.is_finite()) {
        return Err(SimError::NonFiniteState(t0));
    }

    let mut traj = Trajectory::start(t0, y0.clone());
    let mut t = t0;
    let mut y = y0.clone();
    let mut f = rhs(t, &y)?;
    traj.stats.evaluations += 1;

    let mut h_abs = match options.first_step {
        Some(h) => h.min(t1 - t0).min(options.max_step),
        None => {
            let h = initial_step(&mut rhs, t0, &y, &f, t1 - t0, options)?;
            traj.stats.evaluations += 1;
            h
        }
    };
    debug!(t0, t1, h0 = h_abs, dim = y0.len(), "starting Dormand-Prince integration");

    let mut attempts = 0usize;
    while t < t1 {
        let min_step = 10.0 * f64::EPSILON * t.abs().max(f64::MIN_POSITIVE);
        h_abs = h_abs.min(options.max_step);
        let mut step_rejected = false;

        loop {
            attempts += 1;
            if attempts > options.max_steps {
                return Err(SimError::MaxStepsExceeded {
                    t,
                    max_steps: options.max_steps,
                });
            }
            if h_abs < min_step {
                return Err(SimError::StepSizeUnderflow { t, h: h_abs });
            }

            let mut t_new = t + h_abs;
            if t_new > t1 {
                t_new = t1;
            }
            let h = t_new - t;

            let (y_new, f_new, err) = step(&mut rhs, t, &y, &f, h)?;
            traj.stats.evaluations += 6;

            let error_norm = weighted_rms(&err, &y, &y_new, options);
            if error_norm.is_finite() && error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * error_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                };
                if step_rejected {
                    factor = factor.min(1.0);
                }
                if y_new.iter().any(|z| !z.is_finite()) {
                    return Err(SimError::NonFiniteState(t_new));
                }
                trace!(t = t_new, h, error_norm, "accepted step");
                t = t_new;
                y = y_new;
                f = f_new;
                h_abs = h.abs() * factor;
                traj.stats.accepted += 1;
                traj.push(t, y.clone());
                break;
            }

            let factor = if error_norm.is_finite() {
                (SAFETY * error_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR)
            } else {
                MIN_FACTOR
            };
            trace!(t, h, error_norm, "rejected step");
            h_abs = h.abs() * factor;
            step_rejected = true;
            traj.stats.rejected += 1;
        }
    }

    debug!(
        accepted = traj.stats.accepted,
        rejected = traj.stats.rejected,
        evaluations = traj.stats.evaluations,
        "integration finished"
    );
    Ok(traj)
}

type StepOutput = (Array1<Complex64>, Array1<Complex64>, Array1<Complex64>);

/// One Dormand–Prince step. Returns (y_new, f(t+h, y_new), error estimate).
fn step<F>(
    rhs: &mut F,
    t: f64,
    y: &Array1<Complex64>,
    k1: &Array1<Complex64>,
    h: f64,
) -> SimResult<StepOutput>
where
    F: FnMut(f64, &Array1<Complex64>) -> SimResult<Array1<Complex64>>,
{
    let k2 = rhs(t + C[1] * h, &combine(y, h, &A2, &[k1]))?;
    let k3 = rhs(t + C[2] * h, &combine(y, h, &A3, &[k1, &k2]))?;
    let k4 = rhs(t + C[3] * h, &combine(y, h, &A4, &[k1, &k2, &k3]))?;
    let k5 = rhs(t + C[4] * h, &combine(y, h, &A5, &[k1, &k2, &k3, &k4]))?;
    let k6 = rhs(t + C[5] * h, &combine(y, h, &A6, &[k1, &k2, &k3, &k4, &k5]))?;
    let y_new = combine(y, h, &B, &[k1, &k2, &k3, &k4, &k5, &k6]);
    let k7 = rhs(t + h, &y_new)?;

    let zero = Array1::zeros(y.len());
    let err = combine(&zero, h, &E, &[k1, &k2, &k3, &k4, &k5, &k6, &k7]);
    Ok((y_new, k7, err))
}

/// y + h · Σ_j w_j k_j
fn combine(
    y: &Array1<Complex64>,
    h: f64,
    weights: &[f64],
    ks: &[&Array1<Complex64>],
) -> Array1<Complex64> {
    let mut out = y.clone();
    for (w, k) in weights.iter().zip(ks) {
        if *w != 0.0 {
            out.scaled_add(Complex64::new(h * w, 0.0), *k);
        }
    }
    out
}

fn weighted_rms(
    err: &Array1<Complex64>,
    y: &Array1<Complex64>,
    y_new: &Array1<Complex64>,
    options: &OdeOptions,
) -> f64 {
    let n = err.len().max(1) as f64;
    let sum: f64 = err
        .iter()
        .zip(y.iter().zip(y_new.iter()))
        .map(|(e, (a, b))| {
            let scale = options.atol + options.rtol * a.norm().max(b.norm());
            (e.norm() / scale).powi(2)
        })
        .sum();
    (sum / n).sqrt()
}

fn rms_scaled(v: &Array1<Complex64>, y: &Array1<Complex64>, options: &OdeOptions) -> f64 {
    let n = v.len().max(1) as f64;
    let sum: f64 = v
        .iter()
        .zip(y.iter())
        .map(|(x, yi)| (x.norm() / (options.atol + options.rtol * yi.norm())).powi(2))
        .sum();
    (sum / n).sqrt()
}

/// Hairer–Nørsett–Wanner starting-step heuristic.
fn initial_step<F>(
    rhs: &mut F,
    t0: f64,
    y0: &Array1<Complex64>,
    f0: &Array1<Complex64>,
    span: f64,
    options: &OdeOptions,
) -> SimResult<f64>
where
    F: FnMut(f64, &Array1<Complex64>) -> SimResult<Array1<Complex64>>,
{
    let d0 = rms_scaled(y0, y0, options);
    let d1 = rms_scaled(f0, y0, options);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(span);

    let y1 = combine(y0, h0, &[1.0], &[f0]);
    let f1 = rhs(t0 + h0, &y1)?;
    let diff = &f1 - f0;
    let d2 = rms_scaled(&diff, y0, options) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    Ok((100.0 * h0).min(h1).min(span).min(options.max_step))
}
