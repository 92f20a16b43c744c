//! Synaptic Membrane Sim - sub-threshold point-neuron simulation engine
//!
//! This library integrates a passive membrane driven by exponential
//! synaptic conductances and external current, with Nernst/GHK reversal
//! potentials to parameterize synaptic driving forces.

// Allow non-snake-case for unit suffixes in field names (mV, nF, MOhm, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod electrochemistry;
pub mod error;
pub mod export;
pub mod membrane;
pub mod synapse;

pub use config::{MembraneParameters, SimulationConfig};
pub use electrochemistry::{
    driving_force, ghk, nernst, Ion, IonTable, PhysicalConstants, ReversalPotential,
};
pub use error::{SimError, SimResult};
pub use membrane::{
    run_parallel, simulate, IntegratorPhase, MembraneIntegrator, MembraneState, TimeGrid,
    TraceSummary, VoltageTrace,
};
pub use synapse::{
    conductance_at, synaptic_current, CurrentInjection, CurrentSource, SpikeTrain, Synapse,
    SynapseParameters, SYNAPTIC_UNIT_SCALE,
};
