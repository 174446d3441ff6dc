use std::f64::consts::{FRAC_PI_4, PI};

use approx::assert_relative_eq;
use nalgebra::Vector3;
use neolab::{
    hg_app_mag, neo_class,
    photometry::{phase_angle, HGModel},
    phase_func, reduc_mag, NeoClass, NeoError, PhaseIndex,
};

#[test]
fn test_reference_values() {
    assert_relative_eq!(
        phase_func(PhaseIndex::Phi1, FRAC_PI_4),
        0.14790968630394927,
        epsilon = 1e-14
    );
    assert_relative_eq!(
        phase_func(PhaseIndex::Phi2, FRAC_PI_4),
        0.5283212147726485,
        epsilon = 1e-14
    );
    assert_relative_eq!(reduc_mag(10.0, FRAC_PI_4, 0.10), 11.826504643588578, epsilon = 1e-12);
    assert_relative_eq!(
        HGModel::new(10.0, None).reduced_magnitude(FRAC_PI_4),
        11.720766748872016,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        hg_app_mag(
            10.0,
            &Vector3::new(-1.0, 0.0, 0.0),
            &Vector3::new(-2.0, 0.0, 0.0),
            0.10
        )
        .unwrap(),
        11.505149978319906,
        epsilon = 1e-12
    );
}

#[test]
fn test_zero_phase_for_aligned_vectors() {
    let directions = [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(1.0, 2.0, -2.0).normalize(),
    ];
    for dir in directions {
        let alpha = phase_angle(&dir, &(3.0 * dir)).unwrap();
        assert_relative_eq!(alpha, 0.0, epsilon = 1e-7);
        assert_relative_eq!(phase_func(PhaseIndex::Phi1, alpha), 1.0, epsilon = 1e-4);
        assert_relative_eq!(phase_func(PhaseIndex::Phi2, alpha), 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_brightness_decreases_with_phase() {
    let mut previous = reduc_mag(15.0, 0.0, 0.15);
    for step in 1..18 {
        let mag = reduc_mag(15.0, step as f64 * PI / 18.0, 0.15);
        assert!(mag > previous);
        previous = mag;
    }
}

#[test]
fn test_magnitude_geometry_errors() {
    let v = Vector3::new(1.0, 0.0, 0.0);
    assert!(matches!(
        hg_app_mag(10.0, &Vector3::zeros(), &v, 0.15),
        Err(NeoError::DegenerateGeometry(_))
    ));
    assert!(matches!(
        hg_app_mag(10.0, &v, &(-v), 0.15),
        Err(NeoError::PhaseAngleOutOfRange(_))
    ));
}

#[test]
fn test_classifier_reference_values() {
    assert_eq!(neo_class(1.9191, 1.0832, 2.7550), NeoClass::Amor);
    assert_eq!(neo_class(1.4702, 0.64699, 2.2935), NeoClass::Apollo);
    assert_eq!(neo_class(0.9668, 0.7901, 1.1434), NeoClass::Aten);
    assert_eq!(neo_class(0.7411, 0.5024, 0.9798), NeoClass::Atira);
    assert_eq!(neo_class(0.7411, 0.5024, 0.9798).to_string(), "Atira");
}

#[test]
fn test_classifier_thresholds_fall_to_other() {
    assert_eq!(neo_class(1.5, 1.017, 2.0), NeoClass::Other);
    assert_eq!(neo_class(1.5, 1.3, 2.0), NeoClass::Other);
    assert_eq!(neo_class(0.9, 0.5, 0.983), NeoClass::Other);
    assert_eq!(neo_class(1.0, 0.5, 1.5), NeoClass::Other);
    assert_eq!(neo_class(2.7, 2.1, 3.3), NeoClass::Other);
}
