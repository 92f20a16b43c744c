//! Exponential synaptic conductance.
//!
//! Each presynaptic spike at t_s opens a conductance that decays with time
//! constant tau:
//!
//!   g(t) = Σ_s g_max · exp(-(t - t_s) / tau) · H(t - t_s)
//!
//! where H is the Heaviside gate (a spike at the query instant counts, a
//! future spike does not). The resulting current is
//!
//!   I_syn = scale · g(t) · (V - E_syn)
//!
//! Nothing is cached between calls; g(t) is recomputed from the full train.

use serde::{Deserialize, Serialize};

use super::{CurrentSource, SpikeTrain};
use crate::error::{SimError, SimResult};

/// Converts nS · mV (pA) to nA
pub const SYNAPTIC_UNIT_SCALE: f64 = 1e-3;

/// Kinetic parameters of one synapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynapseParameters {
    /// Conductance added per spike (nS)
    pub peak_conductance_nS: f64,
    /// Decay time constant (ms), must be > 0
    pub decay_time_constant_ms: f64,
    /// Reversal potential E_syn (mV)
    pub reversal_potential_mV: f64,
}

impl SynapseParameters {
    pub fn new(peak_conductance_nS: f64, decay_time_constant_ms: f64, reversal_potential_mV: f64) -> SimResult<Self> {
        let params = Self {
            peak_conductance_nS,
            decay_time_constant_ms,
            reversal_potential_mV,
        };
        params.validate()?;
        Ok(params)
    }

    /// Fast AMPA-like excitatory synapse
    pub fn excitatory() -> Self {
        Self {
            peak_conductance_nS: 50.0,
            decay_time_constant_ms: 2.0,
            reversal_potential_mV: 0.0,
        }
    }

    /// Slower GABA_A-like inhibitory synapse
    pub fn inhibitory() -> Self {
        Self {
            peak_conductance_nS: 50.0,
            decay_time_constant_ms: 10.0,
            reversal_potential_mV: -80.0,
        }
    }

    /// Preset by name ("excitatory" / "inhibitory")
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "excitatory" => Some(Self::excitatory()),
            "inhibitory" => Some(Self::inhibitory()),
            _ => None,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        check_tau(self.decay_time_constant_ms)?;
        if !self.peak_conductance_nS.is_finite() || !self.reversal_potential_mV.is_finite() {
            return Err(SimError::Domain(format!("non-finite synapse parameters: {:?}", self)));
        }
        Ok(())
    }
}

fn check_tau(tau_ms: f64) -> SimResult<()> {
    if tau_ms > 0.0 {
        Ok(())
    } else {
        Err(SimError::Domain(format!(
            "decay time constant must be > 0 (got {} ms)",
            tau_ms
        )))
    }
}

/// Summed conductance (nS) at `time_ms` from all spikes at or before it
pub fn conductance_at(time_ms: f64, spike_times_ms: &[f64], g_max_nS: f64, tau_ms: f64) -> SimResult<f64> {
    check_tau(tau_ms)?;

    let g = spike_times_ms
        .iter()
        .map(|&t_s| time_ms - t_s)
        .filter(|&elapsed| elapsed >= 0.0)
        .map(|elapsed| g_max_nS * (-elapsed / tau_ms).exp())
        .sum();
    Ok(g)
}

/// Synaptic current `unit_scale · g(t) · (V - E_syn)`
pub fn synaptic_current(
    time_ms: f64,
    voltage_mV: f64,
    spike_times_ms: &[f64],
    g_max_nS: f64,
    tau_ms: f64,
    reversal_mV: f64,
    unit_scale: f64,
) -> SimResult<f64> {
    let g = conductance_at(time_ms, spike_times_ms, g_max_nS, tau_ms)?;
    Ok(unit_scale * g * (voltage_mV - reversal_mV))
}

/// A synapse bound to its presynaptic spike train
#[derive(Debug, Clone)]
pub struct Synapse {
    name: String,
    pub params: SynapseParameters,
    pub spikes: SpikeTrain,
    /// Conductance·voltage to current factor
    pub unit_scale: f64,
}

impl Synapse {
    /// Validated synapse with the default unit scale
    pub fn new(name: impl Into<String>, params: SynapseParameters, spikes: SpikeTrain) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            name: name.into(),
            params,
            spikes,
            unit_scale: SYNAPTIC_UNIT_SCALE,
        })
    }

    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    pub fn conductance_at(&self, time_ms: f64) -> SimResult<f64> {
        conductance_at(
            time_ms,
            self.spikes.times(),
            self.params.peak_conductance_nS,
            self.params.decay_time_constant_ms,
        )
    }
}

impl CurrentSource for Synapse {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_at(&self, time_ms: f64, voltage_mV: f64) -> SimResult<f64> {
        synaptic_current(
            time_ms,
            voltage_mV,
            self.spikes.times(),
            self.params.peak_conductance_nS,
            self.params.decay_time_constant_ms,
            self.params.reversal_potential_mV,
            self.unit_scale,
        )
    }
}
