//! Reference-frame rotations and unit conversions between the Horizons output
//! (ICRF / equatorial J2000, kilometers) and the catalog frame (ecliptic J2000, AU).
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Kilometer, AU, OBLIQUITY_J2000_ARCSEC, RADSEC};

/// Rotation matrix of angle `alpha` (radians) around axis `k` (0 = x, 1 = y, 2 = z),
/// in the passive convention: coordinates of a fixed vector in the rotated frame.
///
/// Panics if `k` is not 0, 1 or 2.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0, 1 or 2)"),
    };

    Rotation3::from_axis_angle(&axis, -alpha).into()
}

/// Mean obliquity of the ecliptic at J2000, in radians.
pub fn obliquity_j2000() -> f64 {
    OBLIQUITY_J2000_ARCSEC * RADSEC
}

/// Equatorial J2000 → ecliptic J2000.
pub fn equatorial_to_ecliptic(v: &Vector3<f64>) -> Vector3<f64> {
    rotmt(obliquity_j2000(), 0) * v
}

/// Ecliptic J2000 → equatorial J2000.
pub fn ecliptic_to_equatorial(v: &Vector3<f64>) -> Vector3<f64> {
    rotmt(-obliquity_j2000(), 0) * v
}

pub fn km_to_au(v: &Vector3<Kilometer>) -> Vector3<f64> {
    v / AU
}

pub fn au_to_km(v: &Vector3<f64>) -> Vector3<Kilometer> {
    v * AU
}
