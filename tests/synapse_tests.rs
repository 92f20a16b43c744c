//! Integration tests for synaptic conductance
//!
//! Tests validate:
//! - Zero conductance without spikes
//! - Causality (future spikes contribute nothing)
//! - Peak value at the spike instant and monotonic decay
//! - Order independence of the spike sum
//! - Seeded spike-train generation

use rand::rngs::StdRng;
use rand::SeedableRng;
use synaptic_membrane_sim::{
    conductance_at, synaptic_current, CurrentSource, SpikeTrain, Synapse, SynapseParameters,
    SYNAPTIC_UNIT_SCALE,
};

#[test]
fn test_no_spikes_zero_conductance() {
    for t in [-10.0, 0.0, 3.5, 1e6] {
        assert_eq!(conductance_at(t, &[], 50.0, 2.0).unwrap(), 0.0);
    }
}

#[test]
fn test_future_spike_contributes_nothing() {
    let t_s = 100.0;
    for t in [0.0, 50.0, 99.0, 99.999999] {
        assert_eq!(conductance_at(t, &[t_s], 50.0, 10.0).unwrap(), 0.0);
    }
}

#[test]
fn test_peak_at_spike_instant() {
    for (g_max, tau) in [(50.0, 2.0), (1.5, 10.0), (0.25, 0.1)] {
        assert_eq!(conductance_at(42.0, &[42.0], g_max, tau).unwrap(), g_max);
    }
}

#[test]
fn test_monotonic_decay() {
    let mut previous = conductance_at(10.0, &[10.0], 50.0, 2.0).unwrap();
    for k in 1..200 {
        let t = 10.0 + k as f64 * 0.1;
        let g = conductance_at(t, &[10.0], 50.0, 2.0).unwrap();
        assert!(g < previous, "conductance must decay: g({}) = {} >= {}", t, g, previous);
        previous = g;
    }
}

#[test]
fn test_order_independent() {
    let sorted = [1.0, 2.0, 3.0, 5.0, 8.0];
    let shuffled = [8.0, 1.0, 5.0, 3.0, 2.0];
    let a = conductance_at(9.0, &sorted, 50.0, 2.0).unwrap();
    let b = conductance_at(9.0, &shuffled, 50.0, 2.0).unwrap();
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn test_current_vanishes_at_reversal() {
    let params = SynapseParameters::inhibitory();
    let i = synaptic_current(
        5.0,
        params.reversal_potential_mV,
        &[0.0, 1.0],
        params.peak_conductance_nS,
        params.decay_time_constant_ms,
        params.reversal_potential_mV,
        SYNAPTIC_UNIT_SCALE,
    )
    .unwrap();
    assert_eq!(i, 0.0);
}

#[test]
fn test_seeded_train_drives_synapse_deterministically() {
    let build = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let spikes = SpikeTrain::uniform(20, 0.0, 100.0, &mut rng).unwrap();
        Synapse::new("inh", SynapseParameters::inhibitory(), spikes).unwrap()
    };

    let a = build(42);
    let b = build(42);
    for k in 0..100 {
        let t = k as f64;
        assert_eq!(
            a.current_at(t, -65.0).unwrap().to_bits(),
            b.current_at(t, -65.0).unwrap().to_bits()
        );
    }
}

#[test]
fn test_conductance_is_pure() {
    let spikes = [0.5, 1.5, 1.5, 7.0];
    let first = conductance_at(8.0, &spikes, 50.0, 2.0).unwrap();
    for _ in 0..100 {
        assert_eq!(conductance_at(8.0, &spikes, 50.0, 2.0).unwrap().to_bits(), first.to_bits());
    }
}
