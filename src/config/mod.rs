//! Configuration module for loading simulation parameters.
//!
//! Everything is plain numeric records; JSON is the only file format.

mod parameters;

pub use parameters::{
    MembraneParameters, SimulationConfig, SpikeTrainConfig, SynapseConfig, SynapseKinetics,
};
