//! # Keplerian orbital elements
//!
//! This module defines [`KeplerianElements`], the classical element set `(a, e, i, Ω, ω, M)`
//! of a heliocentric orbit, and the **two-body propagation** used to turn catalog
//! elements into position and velocity vectors at any epoch.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **radians**
//! - Time: **days**, epochs in **MJD (TT)**
//!
//! The reference frame is the one of the elements themselves; for MPC catalog orbits
//! this is the **ecliptic and equinox J2000**.
//!
//! ## Example
//!
//! ```rust
//! use neolab::keplerian_element::KeplerianElements;
//!
//! let earth_like = KeplerianElements {
//!     reference_epoch: 51544.5,
//!     semi_major_axis: 1.0,
//!     eccentricity: 0.0,
//!     inclination: 0.0,
//!     ascending_node_longitude: 0.0,
//!     periapsis_argument: 0.0,
//!     mean_anomaly: 0.0,
//! };
//!
//! let (position, _velocity) = earth_like.state_at(51544.5).unwrap();
//! assert!((position.norm() - 1.0).abs() < 1e-12);
//! ```

use std::fmt;

use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{AstronomicalUnit, GAUSS_GRAV, MJD, DPI},
    kepler::{principal_angle, solve_kepler_equation},
    neolab_errors::NeoError,
};

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: MJD (TT).
/// * `semi_major_axis`: Astronomical Units (AU).
/// * `eccentricity`: unitless.
/// * `inclination`: radians.
/// * `ascending_node_longitude`: radians (Ω).
/// * `periapsis_argument`: radians (ω).
/// * `mean_anomaly`: radians (M) at `reference_epoch`.
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
}

impl KeplerianElements {
    /// Perihelion distance `q = a(1 − e)`.
    pub fn perihelion_distance(&self) -> AstronomicalUnit {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Aphelion distance `Q = a(1 + e)`.
    pub fn aphelion_distance(&self) -> AstronomicalUnit {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Mean motion `n = k / a^(3/2)` in rad/day.
    pub fn mean_motion(&self) -> f64 {
        GAUSS_GRAV / self.semi_major_axis.powf(1.5)
    }

    /// Orbital period in days.
    pub fn orbital_period(&self) -> f64 {
        DPI / self.mean_motion()
    }

    /// Rotation from the orbital plane (x towards periapsis) to the reference frame,
    /// `Rz(Ω) · Rx(i) · Rz(ω)`.
    fn orbital_to_reference(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.ascending_node_longitude)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.periapsis_argument)
    }

    /// Propagate the orbit to `epoch` under the two-body approximation.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: target epoch in MJD (TT).
    ///
    /// Return
    /// ------
    /// * `(position, velocity)` in AU and AU/day, in the frame of the elements.
    /// * [`NeoError::UnsupportedOrbit`] if the orbit is not elliptic.
    pub fn state_at(&self, epoch: MJD) -> Result<(Vector3<f64>, Vector3<f64>), NeoError> {
        let ecc = self.eccentricity;
        if !(0.0..1.0).contains(&ecc) || self.semi_major_axis <= 0.0 {
            return Err(NeoError::UnsupportedOrbit(ecc));
        }

        let a = self.semi_major_axis;
        let n = self.mean_motion();
        let mean_anomaly = principal_angle(self.mean_anomaly + n * (epoch - self.reference_epoch));
        let ecc_anom = solve_kepler_equation(mean_anomaly, ecc)?;

        let (sin_e, cos_e) = ecc_anom.sin_cos();
        let sqrt_one_minus_e2 = (1.0 - ecc * ecc).sqrt();
        let e_dot = n / (1.0 - ecc * cos_e);

        let position_orb = Vector3::new(a * (cos_e - ecc), a * sqrt_one_minus_e2 * sin_e, 0.0);
        let velocity_orb = Vector3::new(
            -a * sin_e * e_dot,
            a * sqrt_one_minus_e2 * cos_e * e_dot,
            0.0,
        );

        let rot = self.orbital_to_reference();
        Ok((rot * position_orb, rot * velocity_orb))
    }

    /// Heliocentric position only, see [`KeplerianElements::state_at`].
    pub fn position_at(&self, epoch: MJD) -> Result<Vector3<f64>, NeoError> {
        self.state_at(epoch).map(|(position, _)| position)
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / std::f64::consts::PI;
        writeln!(
            f,
            "Keplerian Elements @ epoch (MJD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} AU",
            self.semi_major_axis
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6}°",
            self.mean_anomaly * rad_to_deg
        )
    }
}

#[cfg(test)]
pub(crate) mod test_keplerian_element {
    use super::*;
    use crate::constants::{GAUSS_GRAV_SQUARED, RADEG};
    use approx::assert_relative_eq;

    fn eros() -> KeplerianElements {
        KeplerianElements {
            reference_epoch: 60800.0,
            semi_major_axis: 1.4579210,
            eccentricity: 0.2228359,
            inclination: 10.82847 * RADEG,
            ascending_node_longitude: 304.27008 * RADEG,
            periapsis_argument: 178.92983 * RADEG,
            mean_anomaly: 310.55432 * RADEG,
        }
    }

    #[test]
    fn test_distances() {
        let kep = eros();
        assert_relative_eq!(kep.perihelion_distance(), 1.1330439, epsilon = 1e-6);
        assert_relative_eq!(kep.aphelion_distance(), 1.7827981, epsilon = 1e-6);
        assert_relative_eq!(kep.mean_motion() / RADEG, 0.5598905, epsilon = 1e-6);
    }

    #[test]
    fn test_state_at_epoch_radius() {
        let kep = eros();
        let (r, v) = kep.state_at(kep.reference_epoch).unwrap();

        let e_anom = solve_kepler_equation(kep.mean_anomaly, kep.eccentricity).unwrap();
        let expected_r = kep.semi_major_axis * (1.0 - kep.eccentricity * e_anom.cos());
        assert_relative_eq!(r.norm(), expected_r, epsilon = 1e-12);

        // vis-viva
        let v2 = GAUSS_GRAV_SQUARED * (2.0 / r.norm() - 1.0 / kep.semi_major_axis);
        assert_relative_eq!(v.norm_squared(), v2, epsilon = 1e-14);
    }

    #[test]
    fn test_full_period_returns_to_start() {
        let kep = KeplerianElements {
            reference_epoch: 51544.5,
            semi_major_axis: 1.0,
            eccentricity: 0.0,
            inclination: 0.1,
            ascending_node_longitude: 0.3,
            periapsis_argument: 0.0,
            mean_anomaly: 0.5,
        };
        let start = kep.position_at(51544.5).unwrap();
        let after = kep.position_at(51544.5 + kep.orbital_period()).unwrap();
        assert_relative_eq!(start, after, epsilon = 1e-10);
        assert_relative_eq!(start.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hyperbolic_rejected() {
        let mut kep = eros();
        kep.eccentricity = 1.3;
        assert_eq!(
            kep.state_at(60800.0),
            Err(NeoError::UnsupportedOrbit(1.3))
        );
    }
}
