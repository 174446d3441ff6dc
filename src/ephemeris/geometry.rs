//! # Observing geometry
//!
//! Chains the two-body position of a catalog object with an Earth position from an
//! [`EphemerisProvider`] into the quantities an observer cares about: distances, phase
//! angle, solar elongation and apparent V magnitude from the H-G model.
//!
//! ```text
//!            Sun
//!           /   \
//!      r   /     \  R (Earth)
//!         /  α  ε \
//!     object ----- Earth
//!             Δ
//! ```
use std::fmt;

use nalgebra::Vector3;
use tracing::debug;

use crate::{
    catalog::NeoRecord,
    constants::{AstronomicalUnit, Magnitude, Radian, MJD, RADEG},
    ephemeris::EphemerisProvider,
    neolab_errors::NeoError,
    photometry::phase_angle,
};

/// Sun–object–observer configuration at one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingGeometry {
    pub epoch: MJD,
    /// Sun–object distance r
    pub heliocentric_distance: AstronomicalUnit,
    /// Earth–object distance Δ
    pub geocentric_distance: AstronomicalUnit,
    /// Sun–object–Earth angle α
    pub phase_angle: Radian,
    /// Sun–Earth–object angle
    pub elongation: Radian,
    pub apparent_magnitude: Magnitude,
}

impl ObservingGeometry {
    /// Compute the geometry of `record` seen from the Earth at `mjd`.
    ///
    /// Arguments
    /// ---------
    /// * `record`: catalog object, its elements are propagated with the two-body model.
    /// * `mjd`: epoch in MJD (TT).
    /// * `provider`: heliocentric Earth position source.
    ///
    /// Return
    /// ------
    /// * The geometry, or [`NeoError::MissingAbsoluteMagnitude`] when the record has no H.
    ///   The slope parameter defaults to 0.15 when the record has none.
    pub fn compute<P: EphemerisProvider + ?Sized>(
        record: &NeoRecord,
        mjd: MJD,
        provider: &P,
    ) -> Result<Self, NeoError> {
        let model = record
            .hg_model()
            .ok_or_else(|| NeoError::MissingAbsoluteMagnitude(record.designation.clone()))?;

        let object = record.keplerian_elements().position_at(mjd)?;
        let earth = provider.earth_position(mjd)?;

        let obj_to_observer: Vector3<f64> = earth - object;
        let obj_to_sun: Vector3<f64> = -object;

        let alpha = phase_angle(&obj_to_observer, &obj_to_sun)?;
        let elongation = phase_angle(&(-earth), &(object - earth))?;
        let apparent_magnitude = model.apparent_magnitude(&obj_to_observer, &obj_to_sun)?;

        debug!(
            designation = record.designation.as_str(),
            mjd, apparent_magnitude, "observing geometry"
        );

        Ok(ObservingGeometry {
            epoch: mjd,
            heliocentric_distance: object.norm(),
            geocentric_distance: obj_to_observer.norm(),
            phase_angle: alpha,
            elongation,
            apparent_magnitude,
        })
    }
}

impl fmt::Display for ObservingGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>12.4} {:>8.4} {:>8.4} {:>7.2} {:>7.2} {:>6.2}",
            self.epoch,
            self.heliocentric_distance,
            self.geocentric_distance,
            self.phase_angle / RADEG,
            self.elongation / RADEG,
            self.apparent_magnitude
        )
    }
}

/// [`ObservingGeometry::compute`] over a list of epochs, stopping at the first failure.
pub fn ephemeris_table<P: EphemerisProvider + ?Sized>(
    record: &NeoRecord,
    mjd_list: &[MJD],
    provider: &P,
) -> Result<Vec<ObservingGeometry>, NeoError> {
    mjd_list
        .iter()
        .map(|&mjd| ObservingGeometry::compute(record, mjd, provider))
        .collect()
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use crate::{
        catalog::catalog_test::apollo, ephemeris::mean_earth::MeanEarthEphemeris,
        photometry::hg_app_mag,
    };
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Earth fixed on the +x axis at 1 AU.
    struct FixedEarth;

    impl EphemerisProvider for FixedEarth {
        fn earth_position(&self, _mjd: MJD) -> Result<Vector3<f64>, NeoError> {
            Ok(Vector3::x())
        }
    }

    #[test]
    fn test_geometry_consistency() {
        let record = apollo();
        let mjd = record.epoch + 30.0;
        let geom = ObservingGeometry::compute(&record, mjd, &FixedEarth).unwrap();

        let object = record.keplerian_elements().position_at(mjd).unwrap();
        assert_relative_eq!(geom.heliocentric_distance, object.norm(), epsilon = 1e-14);
        assert_relative_eq!(
            geom.geocentric_distance,
            (Vector3::x() - object).norm(),
            epsilon = 1e-14
        );

        // triangle Sun-object-Earth: α + ε + Sun angle = π
        let sun_angle = phase_angle(&object, &Vector3::x()).unwrap();
        assert_relative_eq!(geom.phase_angle + geom.elongation + sun_angle, PI, epsilon = 1e-10);

        let expected = hg_app_mag(16.07, &(Vector3::x() - object), &(-object), 0.09).unwrap();
        assert_relative_eq!(geom.apparent_magnitude, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_default_slope() {
        let mut record = apollo();
        record.slope_g = None;
        let geom = ObservingGeometry::compute(&record, record.epoch, &FixedEarth).unwrap();

        let object = record.keplerian_elements().position_at(record.epoch).unwrap();
        let expected = hg_app_mag(16.07, &(Vector3::x() - object), &(-object), 0.15).unwrap();
        assert_relative_eq!(geom.apparent_magnitude, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_abs_mag() {
        let mut record = apollo();
        record.abs_mag = None;
        assert_eq!(
            ObservingGeometry::compute(&record, record.epoch, &MeanEarthEphemeris),
            Err(NeoError::MissingAbsoluteMagnitude("01862".into()))
        );
    }

    #[test]
    fn test_ephemeris_table() {
        let record = apollo();
        let epochs: Vec<f64> = (0..5).map(|d| record.epoch + 10.0 * d as f64).collect();
        let table = ephemeris_table(&record, &epochs, &MeanEarthEphemeris).unwrap();
        assert_eq!(table.len(), 5);
        for (row, mjd) in table.iter().zip(&epochs) {
            assert_eq!(row.epoch, *mjd);
            assert!(row.phase_angle >= 0.0 && row.phase_angle < PI);
            assert!(row.elongation >= 0.0 && row.elongation <= PI);
        }
    }
}
