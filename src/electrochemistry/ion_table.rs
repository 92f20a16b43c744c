//! Ion concentration table.
//!
//! Replaces global concentration/valence dictionaries with an explicit value
//! that is validated once and never mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A single ionic species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ion {
    /// Identifier used for lookups (e.g. "K+")
    pub name: String,
    /// Intracellular concentration (mM)
    pub concentration_in_mM: f64,
    /// Extracellular concentration (mM)
    pub concentration_out_mM: f64,
    /// Signed charge number
    pub valence: i32,
}

impl Ion {
    pub fn new(name: impl Into<String>, concentration_in_mM: f64, concentration_out_mM: f64, valence: i32) -> Self {
        Self {
            name: name.into(),
            concentration_in_mM,
            concentration_out_mM,
            valence,
        }
    }

    fn validate(&self) -> SimResult<()> {
        for value in [self.concentration_in_mM, self.concentration_out_mM] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::InvalidConcentration {
                    ion: self.name.clone(),
                    value,
                });
            }
        }
        if self.valence == 0 {
            return Err(SimError::Domain(format!("ion {} has zero valence", self.name)));
        }
        Ok(())
    }
}

/// Immutable, validated set of ions keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Ion>", into = "Vec<Ion>")]
pub struct IonTable {
    ions: BTreeMap<String, Ion>,
}

impl IonTable {
    /// Build a table, rejecting any non-positive concentration or a
    /// repeated ion name
    pub fn new(ions: impl IntoIterator<Item = Ion>) -> SimResult<Self> {
        let mut map = BTreeMap::new();
        for ion in ions {
            ion.validate()?;
            if map.contains_key(&ion.name) {
                return Err(SimError::Domain(format!("ion {} listed more than once", ion.name)));
            }
            map.insert(ion.name.clone(), ion);
        }
        Ok(Self { ions: map })
    }

    /// Typical mammalian neuron gradients (mM)
    /// Reference: Hille 2001, Table 1.1
    pub fn mammalian_neuron() -> Self {
        let ions = [
            ("K+", 150.0, 4.0, 1),
            ("Na+", 15.0, 125.0, 1),
            ("Cl-", 10.0, 110.0, -1),
        ]
        .into_iter()
        .map(|(name, c_in, c_out, z)| (name.to_string(), Ion::new(name, c_in, c_out, z)))
        .collect();

        Self { ions }
    }

    /// Look up an ion by name
    pub fn get(&self, name: &str) -> SimResult<&Ion> {
        self.ions
            .get(name)
            .ok_or_else(|| SimError::UnknownIon(name.to_string()))
    }

    /// Valence of the named ion
    pub fn valence(&self, name: &str) -> SimResult<i32> {
        self.get(name).map(|ion| ion.valence)
    }

    /// Iterate over ions in name order
    pub fn ions(&self) -> impl Iterator<Item = &Ion> {
        self.ions.values()
    }

    pub fn len(&self) -> usize {
        self.ions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ions.is_empty()
    }
}

impl Default for IonTable {
    fn default() -> Self {
        Self::mammalian_neuron()
    }
}

impl TryFrom<Vec<Ion>> for IonTable {
    type Error = SimError;

    fn try_from(ions: Vec<Ion>) -> SimResult<Self> {
        Self::new(ions)
    }
}

impl From<IonTable> for Vec<Ion> {
    fn from(table: IonTable) -> Self {
        table.ions.into_values().collect()
    }
}
