use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    constants::{Radian, DPI},
    neolab_errors::NeoError,
};

/// Returns the principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Solve Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly.
///
/// Newton–Raphson iterations start from `M + e·sin(M)`, or from `π` for
/// highly eccentric orbits where the first guess overshoots.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians (any value, normalized internally).
/// * `eccentricity`: e, must lie in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly E in [0, 2π), or [`NeoError::UnsupportedOrbit`] for
///   parabolic / hyperbolic eccentricities.
pub fn solve_kepler_equation(mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, NeoError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(NeoError::UnsupportedOrbit(eccentricity));
    }

    let mean_anomaly = principal_angle(mean_anomaly);
    if eccentricity == 0.0 {
        return Ok(mean_anomaly);
    }

    let f = |ecc_anom: f64| ecc_anom - eccentricity * ecc_anom.sin() - mean_anomaly;
    let df = |ecc_anom: f64| 1.0 - eccentricity * ecc_anom.cos();

    let x0 = if eccentricity > 0.8 {
        std::f64::consts::PI
    } else {
        mean_anomaly + eccentricity * mean_anomaly.sin()
    };

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 50,
    };

    let ecc_anom = find_root_newton_raphson(x0, &f, &df, &mut tol)?;
    Ok(principal_angle(ecc_anom))
}
