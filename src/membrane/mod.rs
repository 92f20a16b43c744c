//! Membrane voltage integration.
//!
//! Explicit (forward) Euler on the passive membrane equation:
//!
//!   C_m · dV/dt = -(V - V_rest)/R_m - Σ I_syn(t, V) + I_e/A
//!
//! The voltage is the only mutable quantity; it is owned by the integrator.
//! Step `i` is evaluated at t = i · dt (recomputed, never accumulated).

pub mod integrator;
pub mod sweep;
pub mod trace;

pub use integrator::{simulate, IntegratorPhase, MembraneIntegrator};
pub use sweep::run_parallel;
pub use trace::{TraceSummary, VoltageTrace};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Largest step count a single grid may describe
pub const MAX_ITERATIONS: usize = 100_000_000;

/// Mutable membrane state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneState {
    /// Membrane potential V (mV)
    pub voltage_mV: f64,
}

/// Fixed-step time discretization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeGridSpec", into = "TimeGridSpec")]
pub struct TimeGrid {
    duration_ms: f64,
    dt_ms: f64,
    iteration_count: usize,
}

/// Serialized form of a `TimeGrid`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeGridSpec {
    pub duration_ms: f64,
    pub dt_ms: f64,
}

impl TimeGrid {
    /// Grid with `round(duration / dt)` steps
    pub fn new(duration_ms: f64, dt_ms: f64) -> SimResult<Self> {
        SimError::require_positive("dt_ms", dt_ms)?;
        if !(duration_ms >= 0.0 && duration_ms.is_finite()) {
            return Err(SimError::InvalidParameter {
                name: "duration_ms",
                value: duration_ms,
            });
        }

        let steps = (duration_ms / dt_ms).round();
        if !(steps <= MAX_ITERATIONS as f64) {
            return Err(SimError::InvalidParameter {
                name: "duration_ms",
                value: duration_ms,
            });
        }

        Ok(Self {
            duration_ms,
            dt_ms,
            iteration_count: steps as usize,
        })
    }

    /// 500 ms at 0.1 ms resolution
    pub fn default_demo() -> Self {
        Self {
            duration_ms: 500.0,
            dt_ms: 0.1,
            iteration_count: 5000,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Time at the start of step `index`
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.dt_ms
    }
}

impl Default for TimeGrid {
    /// 2030 ms at 0.5 ms: 4060 steps
    fn default() -> Self {
        Self {
            duration_ms: 2030.0,
            dt_ms: 0.5,
            iteration_count: 4060,
        }
    }
}

impl TryFrom<TimeGridSpec> for TimeGrid {
    type Error = SimError;

    fn try_from(spec: TimeGridSpec) -> SimResult<Self> {
        Self::new(spec.duration_ms, spec.dt_ms)
    }
}

impl From<TimeGrid> for TimeGridSpec {
    fn from(grid: TimeGrid) -> Self {
        Self {
            duration_ms: grid.duration_ms,
            dt_ms: grid.dt_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_count_rounds() {
        assert_eq!(TimeGrid::new(2030.0, 0.5).unwrap().iteration_count(), 4060);
        assert_eq!(TimeGrid::new(1.0, 0.3).unwrap().iteration_count(), 3);
        assert_eq!(TimeGrid::new(0.0, 0.1).unwrap().iteration_count(), 0);
        assert_eq!(TimeGrid::new(500.0, 0.1).unwrap(), TimeGrid::default_demo());
    }

    #[test]
    fn test_invalid_grid() {
        assert!(TimeGrid::new(10.0, 0.0).is_err());
        assert!(TimeGrid::new(10.0, -0.1).is_err());
        assert!(TimeGrid::new(-1.0, 0.1).is_err());
    }

    #[test]
    fn test_step_count_limit() {
        // duration / dt overflows to infinity
        assert!(matches!(
            TimeGrid::new(1e300, 1e-10),
            Err(SimError::InvalidParameter { name: "duration_ms", .. })
        ));
        assert!(matches!(
            TimeGrid::new(1e9, 1e-3),
            Err(SimError::InvalidParameter { name: "duration_ms", .. })
        ));

        let largest = TimeGrid::new(MAX_ITERATIONS as f64, 1.0).unwrap();
        assert_eq!(largest.iteration_count(), MAX_ITERATIONS);
    }

    #[test]
    fn test_time_is_recomputed() {
        let grid = TimeGrid::new(1000.0, 0.1).unwrap();
        assert_eq!(grid.time_at(0), 0.0);
        // i * dt, not an accumulated sum
        assert_eq!(grid.time_at(9999), 9999.0 * 0.1);
    }

    #[test]
    fn test_serde_validates() {
        let grid: TimeGrid = serde_json::from_str(r#"{"duration_ms": 10.0, "dt_ms": 0.5}"#).unwrap();
        assert_eq!(grid.iteration_count(), 20);
        assert!(serde_json::from_str::<TimeGrid>(r#"{"duration_ms": 10.0, "dt_ms": 0.0}"#).is_err());
    }
}
