//! Offline Earth position from the mean orbital elements of the Earth–Moon barycenter
//! (Standish, J2000 ecliptic, valid 1800–2050).
use nalgebra::Vector3;

use crate::{
    constants::{DAYS_PER_JULIAN_CENTURY, MJD, RADEG, T2000},
    ephemeris::EphemerisProvider,
    kepler::principal_angle,
    keplerian_element::KeplerianElements,
    neolab_errors::NeoError,
};

// (value at J2000, rate per Julian century); angles in degrees
const SEMI_MAJOR_AXIS: (f64, f64) = (1.000_002_61, 0.000_005_62);
const ECCENTRICITY: (f64, f64) = (0.016_711_23, -0.000_043_92);
const INCLINATION: (f64, f64) = (-0.000_015_31, -0.012_946_68);
const MEAN_LONGITUDE: (f64, f64) = (100.464_571_66, 35_999.372_449_81);
const PERIHELION_LONGITUDE: (f64, f64) = (102.937_681_93, 0.323_273_64);

fn linear((value, rate): (f64, f64), centuries: f64) -> f64 {
    value + rate * centuries
}

/// Earth ephemeris from mean elements, no network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanEarthEphemeris;

impl MeanEarthEphemeris {
    /// Mean element set of the Earth–Moon barycenter at `mjd`.
    pub fn elements_at(&self, mjd: MJD) -> KeplerianElements {
        let t = (mjd - T2000) / DAYS_PER_JULIAN_CENTURY;

        let mean_longitude = linear(MEAN_LONGITUDE, t);
        let perihelion_longitude = linear(PERIHELION_LONGITUDE, t);

        // the node is undefined for a near-zero inclination, ϖ is carried by ω
        KeplerianElements {
            reference_epoch: mjd,
            semi_major_axis: linear(SEMI_MAJOR_AXIS, t),
            eccentricity: linear(ECCENTRICITY, t),
            inclination: linear(INCLINATION, t) * RADEG,
            ascending_node_longitude: 0.0,
            periapsis_argument: principal_angle(perihelion_longitude * RADEG),
            mean_anomaly: principal_angle((mean_longitude - perihelion_longitude) * RADEG),
        }
    }
}

impl EphemerisProvider for MeanEarthEphemeris {
    fn earth_position(&self, mjd: MJD) -> Result<Vector3<f64>, NeoError> {
        self.elements_at(mjd).position_at(mjd)
    }
}
