//! Current sources acting on the membrane.
//!
//! Every source follows one contract: given the time and the membrane
//! voltage at the start of an integration step, return the membrane current
//! it carries. Sign convention is outward-positive, so the integrator
//! subtracts the sum of all source currents:
//!
//!   dV = (-I_leak - Σ I_source + I_e/A) · dt / C_m
//!
//! Implementations:
//! - `Synapse`: exponential conductance triggered by a spike train
//! - `CurrentInjection`: rectangular external current pulse

pub mod conductance;
pub mod injection;
pub mod spike_train;

pub use conductance::{
    conductance_at, synaptic_current, Synapse, SynapseParameters, SYNAPTIC_UNIT_SCALE,
};
pub use injection::CurrentInjection;
pub use spike_train::SpikeTrain;

use crate::error::SimResult;

/// Anything that contributes a membrane current at time `t`
pub trait CurrentSource: Send + Sync {
    /// Short label for logs and diagnostics
    fn name(&self) -> &str;

    /// Outward membrane current (nA) at `time_ms` for membrane voltage `voltage_mV`
    fn current_at(&self, time_ms: f64, voltage_mV: f64) -> SimResult<f64>;
}
