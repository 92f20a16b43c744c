//! Rectangular external current pulse.
//!
//! Complements the constant `I_e` of `MembraneParameters` with a drive that
//! is only on inside [onset, offset). The injected current is inward, so it
//! is reported with a negative sign under the outward-positive convention.

use serde::{Deserialize, Serialize};

use super::CurrentSource;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentInjection {
    #[serde(default = "default_injection_name")]
    pub name: String,
    /// Injected current (nA), positive depolarizes
    pub amplitude_nA: f64,
    /// Electrode area the current is spread over
    pub electrode_area: f64,
    /// Pulse start (ms, inclusive)
    pub onset_ms: f64,
    /// Pulse end (ms, exclusive)
    pub offset_ms: f64,
}

fn default_injection_name() -> String {
    "injection".to_string()
}

impl CurrentInjection {
    pub fn new(amplitude_nA: f64, electrode_area: f64, onset_ms: f64, offset_ms: f64) -> SimResult<Self> {
        let injection = Self {
            name: default_injection_name(),
            amplitude_nA,
            electrode_area,
            onset_ms,
            offset_ms,
        };
        injection.validate()?;
        Ok(injection)
    }

    pub fn validate(&self) -> SimResult<()> {
        SimError::require_positive("electrode_area", self.electrode_area)?;
        if !(self.offset_ms >= self.onset_ms) {
            return Err(SimError::Domain(format!(
                "injection offset {} ms precedes onset {} ms",
                self.offset_ms, self.onset_ms
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn is_active(&self, time_ms: f64) -> bool {
        time_ms >= self.onset_ms && time_ms < self.offset_ms
    }
}

impl CurrentSource for CurrentInjection {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_at(&self, time_ms: f64, _voltage_mV: f64) -> SimResult<f64> {
        if self.is_active(time_ms) {
            Ok(-self.amplitude_nA / self.electrode_area)
        } else {
            Ok(0.0)
        }
    }
}
