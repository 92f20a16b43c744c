//! Presynaptic spike trains.
//!
//! A train is just a list of arrival times (ms). Order does not matter to
//! the conductance sum and duplicates each count. Random trains are built
//! from a caller-supplied generator so runs stay reproducible.

use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Immutable sequence of spike arrival times (ms)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpikeTrain {
    times_ms: Vec<f64>,
}

impl SpikeTrain {
    pub fn new(times_ms: Vec<f64>) -> Self {
        Self { times_ms }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Homogeneous Poisson train on [0, duration) with exponential
    /// inter-spike intervals. Times come out sorted.
    pub fn poisson<R: Rng + ?Sized>(rate_hz: f64, duration_ms: f64, rng: &mut R) -> SimResult<Self> {
        SimError::require_positive("rate_hz", rate_hz)?;
        if !(duration_ms >= 0.0 && duration_ms.is_finite()) {
            return Err(SimError::InvalidParameter { name: "duration_ms", value: duration_ms });
        }

        // Rate per ms
        let isi = Exp::new(rate_hz / 1000.0)
            .map_err(|e| SimError::Domain(format!("Poisson rate {}: {}", rate_hz, e)))?;

        let mut times_ms = Vec::new();
        let mut t = isi.sample(rng);
        while t < duration_ms {
            times_ms.push(t);
            t += isi.sample(rng);
        }
        Ok(Self { times_ms })
    }

    /// `count` independent spike times drawn uniformly from [start, end)
    pub fn uniform<R: Rng + ?Sized>(count: usize, start_ms: f64, end_ms: f64, rng: &mut R) -> SimResult<Self> {
        if !(start_ms.is_finite() && end_ms.is_finite() && (end_ms - start_ms).is_finite()) {
            return Err(SimError::Domain(format!(
                "uniform spike window is not finite ({} .. {})",
                start_ms, end_ms
            )));
        }
        if !(end_ms > start_ms) {
            return Err(SimError::Domain(format!(
                "uniform spike window is empty ({} .. {})",
                start_ms, end_ms
            )));
        }
        let times_ms = (0..count).map(|_| rng.gen_range(start_ms..end_ms)).collect();
        Ok(Self { times_ms })
    }

    pub fn times(&self) -> &[f64] {
        &self.times_ms
    }

    pub fn len(&self) -> usize {
        self.times_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times_ms.is_empty()
    }
}

impl From<Vec<f64>> for SpikeTrain {
    fn from(times_ms: Vec<f64>) -> Self {
        Self::new(times_ms)
    }
}
