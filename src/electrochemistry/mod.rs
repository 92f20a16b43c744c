//! Electrochemistry: ion concentrations and equilibrium potentials.
//!
//! - `IonTable`: immutable store of intra/extracellular concentrations
//! - `ReversalPotential`: Nernst (single ion) and GHK (multi-ion) potentials
//!
//! Reversal potentials only matter when a synapse's `E_syn` is derived from
//! ion gradients; a synapse configured with a constant reversal potential
//! never touches this module at runtime.
//!
//! References:
//! - Hille B. Ion Channels of Excitable Membranes, 3rd ed. 2001
//! - Goldman DE. J Gen Physiol. 1943;27:37-60
//! - Hodgkin AL, Katz B. J Physiol. 1949;108:37-77

pub mod ion_table;
pub mod reversal;

pub use ion_table::{Ion, IonTable};
pub use reversal::{driving_force, ghk, nernst, ReversalPotential};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Gas constant (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.314;

/// Faraday constant (C/mol)
pub const FARADAY_CONSTANT: f64 = 96485.0;

/// Body temperature used by the reference simulations (K)
pub const BODY_TEMPERATURE_K: f64 = 310.25;

/// Physical constants entering RT/F
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gas constant R (J/(mol·K))
    pub gas_constant: f64,
    /// Faraday constant F (C/mol)
    pub faraday_constant: f64,
    /// Absolute temperature T (K)
    pub temperature_K: f64,
}

impl PhysicalConstants {
    /// Constants at the given temperature, validated
    pub fn at_temperature(temperature_K: f64) -> SimResult<Self> {
        let constants = Self {
            temperature_K,
            ..Self::default()
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Check T > 0 and that R and F are usable
    pub fn validate(&self) -> SimResult<()> {
        SimError::require_positive("temperature_K", self.temperature_K)?;
        SimError::require_positive("gas_constant", self.gas_constant)?;
        SimError::require_positive("faraday_constant", self.faraday_constant)?;
        Ok(())
    }

    /// RT/F in volts
    #[inline]
    pub fn rtf(&self) -> f64 {
        self.gas_constant * self.temperature_K / self.faraday_constant
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gas_constant: GAS_CONSTANT,
            faraday_constant: FARADAY_CONSTANT,
            temperature_K: BODY_TEMPERATURE_K,
        }
    }
}
