//! Annealing schedules s(t) ∈ [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Maps evolution time to the interpolation parameter s.
///
/// Implementations are non-decreasing, start at 0 and reach 1 at
/// [`Schedule::horizon`].
pub trait Schedule {
    /// s(t). Fails for negative (or NaN) t.
    fn value(&self, t: f64) -> SimResult<f64>;

    /// Time at which s first reaches 1.
    fn horizon(&self) -> f64;
}

/// s(t) = min(rate·t, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSchedule {
    rate: f64,
}

impl LinearSchedule {
    /// `rate` must be finite and strictly positive.
    pub fn new(rate: f64) -> SimResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SimError::InvalidRate(rate));
        }
        Ok(Self { rate })
    }

    /// Schedule speed.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Schedule for LinearSchedule {
    fn value(&self, t: f64) -> SimResult<f64> {
        schedule(t, self.rate)
    }

    fn horizon(&self) -> f64 {
        horizon(self.rate)
    }
}

/// Time at which a linear ramp of the given rate reaches s = 1.
pub fn horizon(rate: f64) -> f64 {
    1.0 / rate
}

/// Linear ramp: 0 at t = 0, `rate·t` up to `1/rate`, then clamped to 1.
pub fn schedule(t: f64, rate: f64) -> SimResult<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(SimError::InvalidRate(rate));
    }
    if t.is_nan() || t < 0.0 {
        return Err(SimError::NegativeTime(t));
    }
    if t >= horizon(rate) {
        return Ok(1.0);
    }
    Ok(rate * t)
}
