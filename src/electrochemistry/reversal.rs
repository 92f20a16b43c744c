//! Nernst and Goldman-Hodgkin-Katz reversal potentials.
//!
//! Nernst (single ion):
//!   E = (RT / zF) · ln([X]out / [X]in)
//!
//! GHK (monovalent ions only):
//!   E = (RT / F) · ln( Σ⁺ p·[C]out + Σ⁻ p·[A]in ) / ( Σ⁺ p·[C]in + Σ⁻ p·[A]out )
//!
//! Both use the natural logarithm and return millivolts.

use super::{IonTable, PhysicalConstants};
use crate::error::{SimError, SimResult};

const VOLTS_TO_MV: f64 = 1000.0;

/// Reversal-potential calculator bound to a set of physical constants
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReversalPotential {
    constants: PhysicalConstants,
}

impl ReversalPotential {
    pub fn new(constants: PhysicalConstants) -> SimResult<Self> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Nernst potential (mV)
    pub fn nernst(&self, concentration_out: f64, concentration_in: f64, valence: i32) -> SimResult<f64> {
        if !(concentration_out > 0.0 && concentration_in > 0.0) {
            return Err(SimError::Domain(format!(
                "Nernst requires positive concentrations (out = {}, in = {})",
                concentration_out, concentration_in
            )));
        }
        if valence == 0 {
            return Err(SimError::Domain("Nernst requires a non-zero valence".to_string()));
        }

        let ratio = concentration_out / concentration_in;
        Ok(self.constants.rtf() / valence as f64 * ratio.ln() * VOLTS_TO_MV)
    }

    /// Nernst potential of a named ion from `table` (mV)
    pub fn nernst_for_ion(&self, ion_name: &str, table: &IonTable) -> SimResult<f64> {
        let ion = table.get(ion_name)?;
        self.nernst(ion.concentration_out_mM, ion.concentration_in_mM, ion.valence)
    }

    /// GHK resting potential (mV)
    ///
    /// All four slices must have the same non-zero length and every valence
    /// must be +1 or -1.
    pub fn ghk(
        &self,
        concentrations_out: &[f64],
        concentrations_in: &[f64],
        permeabilities: &[f64],
        valences: &[i32],
    ) -> SimResult<f64> {
        let n = concentrations_out.len();
        if n == 0 {
            return Err(SimError::Domain("GHK requires at least one ion".to_string()));
        }
        if concentrations_in.len() != n || permeabilities.len() != n || valences.len() != n {
            return Err(SimError::Domain(format!(
                "GHK input lengths differ (out = {}, in = {}, p = {}, z = {})",
                n,
                concentrations_in.len(),
                permeabilities.len(),
                valences.len()
            )));
        }

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (index, &valence) in valences.iter().enumerate() {
            let p = permeabilities[index];
            let c_out = concentrations_out[index];
            let c_in = concentrations_in[index];
            match valence {
                1 => {
                    numerator += p * c_out;
                    denominator += p * c_in;
                }
                -1 => {
                    numerator += p * c_in;
                    denominator += p * c_out;
                }
                _ => return Err(SimError::UnsupportedValence { index, valence }),
            }
        }

        if !(numerator > 0.0 && denominator > 0.0) {
            return Err(SimError::Domain(format!(
                "GHK numerator and denominator must be positive (got {} / {})",
                numerator, denominator
            )));
        }

        Ok(self.constants.rtf() * (numerator / denominator).ln() * VOLTS_TO_MV)
    }

    /// GHK potential over named ions of `table` with relative permeabilities
    pub fn ghk_for_ions(&self, table: &IonTable, permeabilities: &[(&str, f64)]) -> SimResult<f64> {
        let mut c_out = Vec::with_capacity(permeabilities.len());
        let mut c_in = Vec::with_capacity(permeabilities.len());
        let mut p = Vec::with_capacity(permeabilities.len());
        let mut z = Vec::with_capacity(permeabilities.len());

        for &(name, permeability) in permeabilities {
            let ion = table.get(name)?;
            c_out.push(ion.concentration_out_mM);
            c_in.push(ion.concentration_in_mM);
            p.push(permeability);
            z.push(ion.valence);
        }

        self.ghk(&c_out, &c_in, &p, &z)
    }
}

/// Nernst potential at body temperature (mV)
pub fn nernst(concentration_out: f64, concentration_in: f64, valence: i32) -> SimResult<f64> {
    ReversalPotential::default().nernst(concentration_out, concentration_in, valence)
}

/// GHK potential at body temperature (mV)
pub fn ghk(
    concentrations_out: &[f64],
    concentrations_in: &[f64],
    permeabilities: &[f64],
    valences: &[i32],
) -> SimResult<f64> {
    ReversalPotential::default().ghk(concentrations_out, concentrations_in, permeabilities, valences)
}

/// Driving force V - E (mV); positive means outward current for a cation channel
#[inline]
pub fn driving_force(voltage_mV: f64, reversal_mV: f64) -> f64 {
    voltage_mV - reversal_mV
}
