//! Parameter structures for membrane simulations.
//!
//! Default values reproduce the reference sub-threshold run: a passive
//! membrane released 2 mV above rest relaxes back to -65 mV.
//! Reference: Dayan P, Abbott LF. Theoretical Neuroscience. 2001, ch. 5

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::electrochemistry::{IonTable, PhysicalConstants, ReversalPotential};
use crate::error::{SimError, SimResult};
use crate::membrane::{MembraneIntegrator, TimeGrid};
use crate::synapse::{CurrentInjection, SpikeTrain, Synapse, SynapseParameters, SYNAPTIC_UNIT_SCALE};

/// Passive membrane properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneParameters {
    /// Resting (leak reversal) potential (mV)
    pub resting_potential_mV: f64,
    /// Membrane capacitance C_m (nF), must be > 0
    pub capacitance_nF: f64,
    /// Membrane resistance R_m (MΩ), must be > 0
    pub resistance_MOhm: f64,
    /// Constant external current I_e (nA)
    pub external_current_nA: f64,
    /// Electrode area A the external current is divided by, must be > 0
    pub electrode_area: f64,
}

impl MembraneParameters {
    pub fn validate(&self) -> SimResult<()> {
        SimError::require_positive("capacitance_nF", self.capacitance_nF)?;
        SimError::require_positive("resistance_MOhm", self.resistance_MOhm)?;
        SimError::require_positive("electrode_area", self.electrode_area)?;
        if !self.resting_potential_mV.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "resting_potential_mV",
                value: self.resting_potential_mV,
            });
        }
        if !self.external_current_nA.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "external_current_nA",
                value: self.external_current_nA,
            });
        }
        Ok(())
    }

    /// Leak current (V - V_rest) / R_m (nA)
    #[inline]
    pub fn leak_current_nA(&self, voltage_mV: f64) -> f64 {
        (voltage_mV - self.resting_potential_mV) / self.resistance_MOhm
    }

    /// External drive I_e / A
    #[inline]
    pub fn external_drive_nA(&self) -> f64 {
        self.external_current_nA / self.electrode_area
    }

    /// tau_m = R_m · C_m (ms)
    pub fn time_constant_ms(&self) -> f64 {
        self.resistance_MOhm * self.capacitance_nF
    }

    /// Voltage the membrane settles at with only leak and I_e (mV)
    pub fn steady_state_mV(&self) -> f64 {
        self.resting_potential_mV + self.resistance_MOhm * self.external_drive_nA()
    }
}

impl Default for MembraneParameters {
    fn default() -> Self {
        Self {
            resting_potential_mV: -65.0,
            capacitance_nF: 10.0,
            resistance_MOhm: 1.0,
            external_current_nA: 0.0,
            electrode_area: 1.0,
        }
    }
}

/// How a synapse's spike train is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpikeTrainConfig {
    /// Fixed list of spike times
    Explicit { times_ms: Vec<f64> },
    /// Poisson train over the whole run (or `duration_ms` if given)
    Poisson {
        rate_hz: f64,
        #[serde(default)]
        duration_ms: Option<f64>,
        seed: u64,
    },
    /// `count` spikes drawn uniformly from [start_ms, end_ms)
    Uniform {
        count: usize,
        start_ms: f64,
        end_ms: f64,
        seed: u64,
    },
}

impl SpikeTrainConfig {
    pub fn build(&self, grid: &TimeGrid) -> SimResult<SpikeTrain> {
        match self {
            Self::Explicit { times_ms } => Ok(SpikeTrain::new(times_ms.clone())),
            Self::Poisson { rate_hz, duration_ms, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                SpikeTrain::poisson(*rate_hz, duration_ms.unwrap_or(grid.duration_ms()), &mut rng)
            }
            Self::Uniform { count, start_ms, end_ms, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                SpikeTrain::uniform(*count, *start_ms, *end_ms, &mut rng)
            }
        }
    }
}

/// Either a named preset or explicit kinetics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SynapseKinetics {
    Preset(String),
    Custom(SynapseParameters),
}

impl SynapseKinetics {
    pub fn resolve(&self) -> SimResult<SynapseParameters> {
        match self {
            Self::Preset(name) => SynapseParameters::preset(name)
                .ok_or_else(|| SimError::Domain(format!("unknown synapse preset '{}'", name))),
            Self::Custom(params) => {
                params.validate()?;
                Ok(*params)
            }
        }
    }
}

/// One synaptic input of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseConfig {
    pub name: String,
    pub kinetics: SynapseKinetics,
    /// Take E_syn from the Nernst potential of this ion instead of the kinetics
    #[serde(default)]
    pub reversal_from_ion: Option<String>,
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64,
    pub spikes: SpikeTrainConfig,
}

fn default_unit_scale() -> f64 {
    SYNAPTIC_UNIT_SCALE
}

fn default_initial_voltage() -> f64 {
    -63.0
}

/// Complete description of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub constants: PhysicalConstants,
    #[serde(default)]
    pub ions: IonTable,
    #[serde(default)]
    pub membrane: MembraneParameters,
    #[serde(default)]
    pub time_grid: TimeGrid,
    /// V(0) (mV)
    #[serde(default = "default_initial_voltage")]
    pub initial_voltage_mV: f64,
    /// Prepend V(0) to the recorded trace
    #[serde(default)]
    pub record_initial_voltage: bool,
    #[serde(default)]
    pub synapses: Vec<SynapseConfig>,
    #[serde(default)]
    pub injections: Vec<CurrentInjection>,
}

impl SimulationConfig {
    /// Load from a JSON file, failing on any read or parse error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading simulation config {:?}", path))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing simulation config {:?}", path))?;
        log::info!("Loaded simulation config from {:?}", path);
        Ok(config)
    }

    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded simulation config from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse simulation config: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Simulation config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Reference run with one excitatory and one inhibitory input
    pub fn synaptic_demo() -> Self {
        Self {
            time_grid: TimeGrid::default_demo(),
            initial_voltage_mV: -65.0,
            synapses: vec![
                SynapseConfig {
                    name: "excitatory".to_string(),
                    kinetics: SynapseKinetics::Preset("excitatory".to_string()),
                    reversal_from_ion: None,
                    unit_scale: SYNAPTIC_UNIT_SCALE,
                    spikes: SpikeTrainConfig::Explicit {
                        times_ms: vec![50.0, 100.0, 150.0, 152.0, 154.0, 300.0],
                    },
                },
                SynapseConfig {
                    name: "inhibitory".to_string(),
                    kinetics: SynapseKinetics::Preset("inhibitory".to_string()),
                    reversal_from_ion: None,
                    unit_scale: SYNAPTIC_UNIT_SCALE,
                    spikes: SpikeTrainConfig::Uniform {
                        count: 10,
                        start_ms: 200.0,
                        end_ms: 400.0,
                        seed: 42,
                    },
                },
            ],
            ..Self::default()
        }
    }

    /// Validate every part and assemble a ready-to-run integrator
    pub fn build(&self) -> SimResult<MembraneIntegrator> {
        let reversal = ReversalPotential::new(self.constants)?;

        let mut integrator = MembraneIntegrator::new(self.membrane, self.time_grid)?
            .with_initial_voltage(self.initial_voltage_mV)?
            .record_initial_voltage(self.record_initial_voltage);

        for synapse_config in &self.synapses {
            let mut params = synapse_config.kinetics.resolve()?;
            if let Some(ion) = &synapse_config.reversal_from_ion {
                params.reversal_potential_mV = reversal.nernst_for_ion(ion, &self.ions)?;
            }
            let spikes = synapse_config.spikes.build(&self.time_grid)?;
            log::debug!(
                "Synapse '{}': {} spikes, tau = {} ms, E = {:.2} mV",
                synapse_config.name,
                spikes.len(),
                params.decay_time_constant_ms,
                params.reversal_potential_mV
            );
            let synapse = Synapse::new(synapse_config.name.clone(), params, spikes)?
                .with_unit_scale(synapse_config.unit_scale);
            integrator.add_source(Box::new(synapse));
        }

        for injection in &self.injections {
            injection.validate()?;
            integrator.add_source(Box::new(injection.clone()));
        }

        Ok(integrator)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            ions: IonTable::default(),
            membrane: MembraneParameters::default(),
            time_grid: TimeGrid::default(),
            initial_voltage_mV: default_initial_voltage(),
            record_initial_voltage: false,
            synapses: Vec::new(),
            injections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_membrane_params() {
        let params = MembraneParameters::default();
        assert!(params.validate().is_ok());
        assert!((params.time_constant_ms() - 10.0).abs() < 1e-12);
        assert!((params.steady_state_mV() - -65.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_membrane_params() {
        for params in [
            MembraneParameters { capacitance_nF: 0.0, ..Default::default() },
            MembraneParameters { resistance_MOhm: -1.0, ..Default::default() },
            MembraneParameters { electrode_area: 0.0, ..Default::default() },
        ] {
            assert!(matches!(params.validate(), Err(SimError::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_steady_state_with_drive() {
        let params = MembraneParameters {
            external_current_nA: 2.0,
            electrode_area: 0.5,
            ..Default::default()
        };
        assert!((params.steady_state_mV() - -61.0).abs() < 1e-12);
    }

    #[test]
    fn test_serialization() {
        let config = SimulationConfig::synaptic_demo();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_kinetics_json_forms() {
        let preset: SynapseKinetics = serde_json::from_str(r#""inhibitory""#).unwrap();
        assert_eq!(preset.resolve().unwrap(), SynapseParameters::inhibitory());

        let custom: SynapseKinetics = serde_json::from_str(
            r#"{"peak_conductance_nS": 10.0, "decay_time_constant_ms": 5.0, "reversal_potential_mV": -70.0}"#,
        )
        .unwrap();
        assert!((custom.resolve().unwrap().decay_time_constant_ms - 5.0).abs() < 1e-12);

        let unknown = SynapseKinetics::Preset("nmda".to_string());
        assert!(unknown.resolve().is_err());
    }

    #[test]
    fn test_build_rejects_bad_synapse() {
        let mut config = SimulationConfig::default();
        config.synapses.push(SynapseConfig {
            name: "broken".to_string(),
            kinetics: SynapseKinetics::Custom(SynapseParameters {
                peak_conductance_nS: 1.0,
                decay_time_constant_ms: 0.0,
                reversal_potential_mV: 0.0,
            }),
            reversal_from_ion: None,
            unit_scale: SYNAPTIC_UNIT_SCALE,
            spikes: SpikeTrainConfig::Explicit { times_ms: vec![1.0] },
        });
        assert!(matches!(config.build(), Err(SimError::Domain(_))));
    }

    #[test]
    fn test_build_reversal_from_ion() {
        let mut config = SimulationConfig::default();
        config.synapses.push(SynapseConfig {
            name: "gaba".to_string(),
            kinetics: SynapseKinetics::Preset("inhibitory".to_string()),
            reversal_from_ion: Some("Cl-".to_string()),
            unit_scale: SYNAPTIC_UNIT_SCALE,
            spikes: SpikeTrainConfig::Explicit { times_ms: vec![] },
        });
        assert_eq!(config.build().unwrap().source_count(), 1);

        config.synapses[0].reversal_from_ion = Some("Ca2+".to_string());
        assert!(matches!(config.build(), Err(SimError::UnknownIon(_))));
    }
}
