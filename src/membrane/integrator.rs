//! Forward-Euler membrane integrator.
//!
//! Per step, with V and t taken at the start of the step:
//! 1. I_leak = (V - V_rest) / R_m
//! 2. I_syn  = Σ source.current_at(t, V)
//! 3. dV     = (-I_leak - I_syn + I_e/A) · dt / C_m
//! 4. V     <- V + dV, t = (i + 1) · dt
//!
//! All currents see the pre-step voltage. Changing that ordering changes
//! the trajectory, so reproducibility depends on it.

use super::{MembraneState, TimeGrid, VoltageTrace};
use crate::config::MembraneParameters;
use crate::error::{SimError, SimResult};
use crate::synapse::CurrentSource;

/// Samples reserved up front; longer runs grow the trace as they go
const PREALLOCATED_SAMPLES: usize = 1 << 20;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorPhase {
    /// Parameters set, voltage at its initial value
    Configured,
    /// At least one step taken, more remaining
    Stepping,
    /// All `iteration_count` steps executed
    Completed,
}

/// Stepping engine for one point neuron
pub struct MembraneIntegrator {
    params: MembraneParameters,
    grid: TimeGrid,
    sources: Vec<Box<dyn CurrentSource>>,
    initial_voltage_mV: f64,
    state: MembraneState,
    step_index: usize,
    trace: VoltageTrace,
}

impl MembraneIntegrator {
    /// Validated integrator starting at V_rest with no current sources
    pub fn new(params: MembraneParameters, grid: TimeGrid) -> SimResult<Self> {
        params.validate()?;
        SimError::require_positive("dt_ms", grid.dt_ms())?;

        let v0 = params.resting_potential_mV;
        Ok(Self {
            params,
            grid,
            sources: Vec::new(),
            initial_voltage_mV: v0,
            state: MembraneState { voltage_mV: v0 },
            step_index: 0,
            trace: VoltageTrace::with_capacity(
                grid.dt_ms(),
                false,
                grid.iteration_count().min(PREALLOCATED_SAMPLES),
            ),
        })
    }

    /// Set V(0); resets any progress
    pub fn with_initial_voltage(mut self, voltage_mV: f64) -> SimResult<Self> {
        if !voltage_mV.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "initial_voltage_mV",
                value: voltage_mV,
            });
        }
        self.initial_voltage_mV = voltage_mV;
        self.reset();
        Ok(self)
    }

    /// Whether the trace starts with V(0); resets any progress
    pub fn record_initial_voltage(mut self, record: bool) -> Self {
        self.trace.includes_initial = record;
        self.reset();
        self
    }

    pub fn with_source(mut self, source: Box<dyn CurrentSource>) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: Box<dyn CurrentSource>) {
        self.sources.push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn params(&self) -> &MembraneParameters {
        &self.params
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn state(&self) -> &MembraneState {
        &self.state
    }

    pub fn voltage(&self) -> f64 {
        self.state.voltage_mV
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Time at the start of the next step
    pub fn time_ms(&self) -> f64 {
        self.grid.time_at(self.step_index)
    }

    /// Trace recorded so far (inspectable after a failed step)
    pub fn trace(&self) -> &VoltageTrace {
        &self.trace
    }

    pub fn into_trace(self) -> VoltageTrace {
        self.trace
    }

    pub fn phase(&self) -> IntegratorPhase {
        if self.step_index >= self.grid.iteration_count() {
            IntegratorPhase::Completed
        } else if self.step_index == 0 {
            IntegratorPhase::Configured
        } else {
            IntegratorPhase::Stepping
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == IntegratorPhase::Completed
    }

    /// Back to `Configured` at V(0) with an empty trace
    pub fn reset(&mut self) {
        self.state.voltage_mV = self.initial_voltage_mV;
        self.step_index = 0;
        self.trace.clear();
        if self.trace.includes_initial {
            self.trace.push(self.initial_voltage_mV);
        }
    }

    /// Advance one Euler step
    ///
    /// A source error leaves voltage, step index and trace at their values
    /// from before the step. Stepping a completed run is a no-op.
    pub fn step(&mut self) -> SimResult<IntegratorPhase> {
        if self.is_complete() {
            return Ok(IntegratorPhase::Completed);
        }

        let v = self.state.voltage_mV;
        let t = self.grid.time_at(self.step_index);

        let i_leak = self.params.leak_current_nA(v);
        let mut i_syn = 0.0;
        for source in &self.sources {
            i_syn += source.current_at(t, v)?;
        }

        let dv = (-i_leak - i_syn + self.params.external_drive_nA()) * self.grid.dt_ms()
            / self.params.capacitance_nF;

        self.state.voltage_mV = v + dv;
        self.step_index += 1;
        self.trace.push(self.state.voltage_mV);

        Ok(self.phase())
    }

    /// Step until completion or until `halt(step_index, voltage)` returns true
    ///
    /// The predicate is checked before each step.
    pub fn run_until<F>(&mut self, mut halt: F) -> SimResult<IntegratorPhase>
    where
        F: FnMut(usize, f64) -> bool,
    {
        while !self.is_complete() {
            if halt(self.step_index, self.state.voltage_mV) {
                log::debug!("Run halted by caller at step {}", self.step_index);
                return Ok(self.phase());
            }
            self.step()?;
        }
        Ok(IntegratorPhase::Completed)
    }

    /// Run every remaining step and return the full trace
    pub fn run_to_completion(&mut self) -> SimResult<&VoltageTrace> {
        log::debug!(
            "Integrating {} steps (dt = {} ms, {} sources)",
            self.grid.iteration_count().saturating_sub(self.step_index),
            self.grid.dt_ms(),
            self.sources.len()
        );
        while !self.is_complete() {
            self.step()?;
        }
        Ok(&self.trace)
    }

    /// Run every remaining step and return only the final voltage
    pub fn run_to_final_voltage(&mut self) -> SimResult<f64> {
        self.run_to_completion()?;
        Ok(self.state.voltage_mV)
    }
}

impl std::fmt::Debug for MembraneIntegrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("MembraneIntegrator")
            .field("params", &self.params)
            .field("grid", &self.grid)
            .field("sources", &names)
            .field("state", &self.state)
            .field("step_index", &self.step_index)
            .finish()
    }
}

/// Integrate a membrane from V_rest with the given sources; returns the trace
pub fn simulate(
    params: MembraneParameters,
    grid: TimeGrid,
    sources: Vec<Box<dyn CurrentSource>>,
) -> SimResult<VoltageTrace> {
    let mut integrator = MembraneIntegrator::new(params, grid)?;
    for source in sources {
        integrator.add_source(source);
    }
    integrator.run_to_completion()?;
    Ok(integrator.into_trace())
}
