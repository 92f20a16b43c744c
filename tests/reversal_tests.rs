//! Integration tests for reversal potentials
//!
//! Tests validate:
//! - Nernst reference value and natural-log scaling
//! - GHK reference value and valence restriction
//! - Ion table lookups feeding the calculators
//! - Temperature dependence through RT/F

use synaptic_membrane_sim::{
    ghk, nernst, Ion, IonTable, PhysicalConstants, ReversalPotential, SimError,
};

#[test]
fn test_nernst_reference_value() {
    // R = 8.314, F = 96485, T = 310.25 K
    let e = nernst(135.0, 5.0, -1).unwrap();
    assert!((e - -88.11).abs() < 0.01, "Nernst should give -88.11 mV, got {:.3}", e);
}

#[test]
fn test_nernst_valence_sign_flips_potential() {
    let cation = nernst(135.0, 5.0, 1).unwrap();
    let anion = nernst(135.0, 5.0, -1).unwrap();
    assert!((cation + anion).abs() < 1e-12);
}

#[test]
fn test_ghk_reference_value() {
    let e = ghk(
        &[4.0, 125.0, 110.0],
        &[150.0, 15.0, 10.0],
        &[1.0, 0.05, 0.45],
        &[1, 1, -1],
    )
    .unwrap();
    assert!((e - -69.73).abs() < 0.01, "GHK should give -69.73 mV, got {:.3}", e);
}

#[test]
fn test_ghk_lies_between_nernst_potentials() {
    let table = IonTable::mammalian_neuron();
    let calc = ReversalPotential::default();

    let e_k = calc.nernst_for_ion("K+", &table).unwrap();
    let e_na = calc.nernst_for_ion("Na+", &table).unwrap();
    let v_rest = calc
        .ghk_for_ions(&table, &[("K+", 1.0), ("Na+", 0.05), ("Cl-", 0.45)])
        .unwrap();

    assert!(v_rest > e_k && v_rest < e_na, "E_K {} < V {} < E_Na {}", e_k, v_rest, e_na);
}

#[test]
fn test_ghk_rejects_any_multivalent_ion() {
    for valence in [2, -2, 3, 0] {
        let result = ghk(&[2.0], &[0.0001], &[1.0], &[valence]);
        assert_eq!(
            result.unwrap_err(),
            SimError::UnsupportedValence { index: 0, valence }
        );
    }
}

#[test]
fn test_ion_table_calcium_ghk() {
    let table = IonTable::new(vec![
        Ion::new("K+", 150.0, 4.0, 1),
        Ion::new("Ca2+", 0.0001, 2.0, 2),
    ])
    .unwrap();
    let calc = ReversalPotential::default();

    // Nernst handles divalent ions; GHK does not
    let e_ca = calc.nernst_for_ion("Ca2+", &table).unwrap();
    assert!(e_ca > 120.0 && e_ca < 140.0, "E_Ca = {}", e_ca);
    assert!(matches!(
        calc.ghk_for_ions(&table, &[("K+", 1.0), ("Ca2+", 0.1)]),
        Err(SimError::UnsupportedValence { index: 1, valence: 2 })
    ));
}

#[test]
fn test_temperature_scales_potential() {
    let warm = ReversalPotential::new(PhysicalConstants::at_temperature(310.25).unwrap()).unwrap();
    let cool = ReversalPotential::new(PhysicalConstants::at_temperature(279.225).unwrap()).unwrap();

    let ratio = cool.nernst(4.0, 150.0, 1).unwrap() / warm.nernst(4.0, 150.0, 1).unwrap();
    assert!((ratio - 0.9).abs() < 1e-9);
}

#[test]
fn test_invalid_constants_rejected() {
    let constants = PhysicalConstants {
        temperature_K: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        ReversalPotential::new(constants),
        Err(SimError::InvalidParameter { name: "temperature_K", .. })
    ));
}

#[test]
fn test_pure_functions_are_bit_identical() {
    let first = nernst(135.0, 5.0, -1).unwrap();
    let first_ghk = ghk(&[4.0, 125.0], &[150.0, 15.0], &[1.0, 0.05], &[1, 1]).unwrap();
    for _ in 0..100 {
        assert_eq!(nernst(135.0, 5.0, -1).unwrap().to_bits(), first.to_bits());
        assert_eq!(
            ghk(&[4.0, 125.0], &[150.0, 15.0], &[1.0, 0.05], &[1, 1]).unwrap().to_bits(),
            first_ghk.to_bits()
        );
    }
}
