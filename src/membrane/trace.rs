//! Recorded voltage trajectories.

use serde::{Deserialize, Serialize};

/// Ordered membrane voltages, one per completed step
///
/// When `includes_initial` is set the first sample is V(0) at t = 0 and
/// sample k sits at t = k · dt. Otherwise sample k is the voltage after step
/// k, i.e. at t = (k + 1) · dt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageTrace {
    pub dt_ms: f64,
    pub includes_initial: bool,
    pub voltages_mV: Vec<f64>,
}

impl VoltageTrace {
    pub fn new(dt_ms: f64, includes_initial: bool) -> Self {
        Self {
            dt_ms,
            includes_initial,
            voltages_mV: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(dt_ms: f64, includes_initial: bool, capacity: usize) -> Self {
        Self {
            dt_ms,
            includes_initial,
            voltages_mV: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, voltage_mV: f64) {
        self.voltages_mV.push(voltage_mV);
    }

    pub(crate) fn clear(&mut self) {
        self.voltages_mV.clear();
    }

    /// Time of sample `index` (ms)
    pub fn time_at(&self, index: usize) -> f64 {
        let offset = if self.includes_initial { 0 } else { 1 };
        (index + offset) as f64 * self.dt_ms
    }

    /// (time, voltage) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.voltages_mV
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.time_at(i), v))
    }

    pub fn voltages(&self) -> &[f64] {
        &self.voltages_mV
    }

    pub fn final_voltage(&self) -> Option<f64> {
        self.voltages_mV.last().copied()
    }

    pub fn len(&self) -> usize {
        self.voltages_mV.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages_mV.is_empty()
    }

    /// Scalar summary, `None` for an empty trace
    pub fn summary(&self) -> Option<TraceSummary> {
        let final_mV = self.final_voltage()?;
        let (min_mV, max_mV, sum) = self.voltages_mV.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(lo, hi, sum), &v| (lo.min(v), hi.max(v), sum + v),
        );

        Some(TraceSummary {
            samples: self.len(),
            duration_ms: self.time_at(self.len() - 1),
            final_mV,
            min_mV,
            max_mV,
            mean_mV: sum / self.len() as f64,
        })
    }
}

/// Scalar statistics of a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub samples: usize,
    /// Time of the last sample (ms)
    pub duration_ms: f64,
    pub final_mV: f64,
    pub min_mV: f64,
    pub max_mV: f64,
    pub mean_mV: f64,
}

impl TraceSummary {
    pub fn print_summary(&self) {
        println!("=== Membrane Trace ===");
        println!("  Samples:   {}", self.samples);
        println!("  Duration:  {:.2} ms", self.duration_ms);
        println!("  Final V:   {:.3} mV", self.final_mV);
        println!("  Min V:     {:.3} mV", self.min_mV);
        println!("  Max V:     {:.3} mV", self.max_mV);
        println!("  Mean V:    {:.3} mV", self.mean_mV);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(includes_initial: bool, values: &[f64]) -> VoltageTrace {
        let mut trace = VoltageTrace::new(0.5, includes_initial);
        for &v in values {
            trace.push(v);
        }
        trace
    }

    #[test]
    fn test_time_offsets() {
        assert_eq!(trace(true, &[1.0, 2.0]).time_at(1), 0.5);
        assert_eq!(trace(false, &[1.0, 2.0]).time_at(1), 1.0);
    }

    #[test]
    fn test_summary() {
        let summary = trace(false, &[-65.0, -60.0, -70.0, -61.0]).summary().unwrap();
        assert_eq!(summary.samples, 4);
        assert_eq!(summary.final_mV, -61.0);
        assert_eq!(summary.min_mV, -70.0);
        assert_eq!(summary.max_mV, -60.0);
        assert!((summary.mean_mV - -64.0).abs() < 1e-12);
        assert_eq!(summary.duration_ms, 2.0);
    }

    #[test]
    fn test_empty_summary() {
        assert!(trace(false, &[]).summary().is_none());
    }
}
