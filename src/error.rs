//! Error taxonomy for the simulation core.
//!
//! Every failure is detected as early as possible (usually at construction)
//! and propagated to the caller unchanged. Nothing here is retried.

/// Result alias used throughout the library
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the electrochemistry, synapse and membrane modules
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A structural parameter is outside its valid range
    /// (capacitance, resistance, area, time step, temperature, ...)
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A numeric argument is outside the mathematical domain of an operation
    #[error("Domain error: {0}")]
    Domain(String),

    /// GHK only handles monovalent ions
    #[error("Unsupported valence {valence} at position {index} (only |z| = 1 is supported)")]
    UnsupportedValence { index: usize, valence: i32 },

    /// Lookup miss in an `IonTable`
    #[error("Unknown ion: {0}")]
    UnknownIon(String),

    /// An ion concentration is zero or negative
    #[error("Invalid concentration for {ion}: {value} mM (must be > 0)")]
    InvalidConcentration { ion: String, value: f64 },
}

impl SimError {
    /// Check `value > 0` (and finite), otherwise `InvalidParameter`
    pub(crate) fn require_positive(name: &'static str, value: f64) -> SimResult<f64> {
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(SimError::InvalidParameter { name, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(SimError::require_positive("dt_ms", 0.5), Ok(0.5));
        assert!(SimError::require_positive("dt_ms", 0.0).is_err());
        assert!(SimError::require_positive("dt_ms", -1.0).is_err());
        assert!(SimError::require_positive("dt_ms", f64::NAN).is_err());
        assert!(SimError::require_positive("dt_ms", f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let err = SimError::InvalidParameter { name: "capacitance_nF", value: 0.0 };
        assert_eq!(err.to_string(), "Invalid parameter: capacitance_nF = 0");

        let err = SimError::UnknownIon("Ca2+".to_string());
        assert_eq!(err.to_string(), "Unknown ion: Ca2+");
    }
}
