//! # IAU H-G photometric model
//!
//! Apparent brightness of an asteroid from its **absolute magnitude** `H`, its
//! **slope parameter** `G` and the Sun–object–observer geometry (Bowell et al. 1989).
//!
//! ## Model
//!
//! The reduced magnitude, i.e. the magnitude the object would have at 1 AU from both
//! the Sun and the observer, is
//!
//! ```text
//! H(α) = H − 2.5·log10((1 − G)·Φ₁(α) + G·Φ₂(α))
//! Φᵢ(α) = exp(−Aᵢ · tan(α/2)^Bᵢ)
//! ```
//!
//! with `(A₁, B₁) = (3.33, 0.63)` and `(A₂, B₂) = (1.87, 1.22)`. The apparent magnitude
//! adds the distance term `5·log10(r·Δ)`, where `r` and `Δ` are the object–Sun and
//! object–observer distances in AU.
//!
//! ## Units & Conventions
//!
//! - Phase angle `α` in **radians**, valid in `[0, π)`.
//! - Geometry vectors in **AU**, both taken *from the object* towards the observer and
//!   towards the illumination source.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use neolab::photometry::hg_app_mag;
//!
//! let to_observer = Vector3::new(-1.0, 0.0, 0.0);
//! let to_sun = Vector3::new(-2.0, 0.0, 0.0);
//! let v = hg_app_mag(10.0, &to_observer, &to_sun, 0.10).unwrap();
//! assert!((v - 11.505149978319906).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::{
    constants::{Magnitude, Radian, DEFAULT_SLOPE_G, DIAMETER_CONSTANT_KM},
    neolab_errors::NeoError,
};

/// Selects one of the two basis functions of the H-G phase curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseIndex {
    /// Φ₁, `A = 3.33`, `B = 0.63`
    Phi1,
    /// Φ₂, `A = 1.87`, `B = 1.22`
    Phi2,
}

impl PhaseIndex {
    /// `(A, B)` coefficients of the basis function.
    pub fn coefficients(self) -> (f64, f64) {
        match self {
            PhaseIndex::Phi1 => (3.33, 0.63),
            PhaseIndex::Phi2 => (1.87, 1.22),
        }
    }
}

impl TryFrom<u8> for PhaseIndex {
    type Error = NeoError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            1 => Ok(PhaseIndex::Phi1),
            2 => Ok(PhaseIndex::Phi2),
            other => Err(NeoError::InvalidPhaseIndex(other)),
        }
    }
}

/// Evaluate the H-G basis function `Φ(α) = exp(−A · tan(α/2)^B)`.
///
/// The phase angle is not checked: the caller keeps it in `[0, π)`.
///
/// Arguments
/// ---------
/// * `index`: which basis function (Φ₁ or Φ₂).
/// * `phase_angle`: Sun–object–observer angle in radians.
///
/// Return
/// ------
/// * The value of the basis function, `1.0` at zero phase.
pub fn phase_func(index: PhaseIndex, phase_angle: Radian) -> f64 {
    let (a, b) = index.coefficients();
    (-a * (phase_angle / 2.0).tan().powf(b)).exp()
}

/// Reduced magnitude of the H-G model at the given phase angle.
///
/// Arguments
/// ---------
/// * `abs_mag`: absolute magnitude H.
/// * `phase_angle`: phase angle in radians, in `[0, π)`.
/// * `slope_g`: slope parameter G, conventionally [`DEFAULT_SLOPE_G`].
///
/// Return
/// ------
/// * `H − 2.5·log10((1 − G)·Φ₁ + G·Φ₂)`
pub fn reduc_mag(abs_mag: Magnitude, phase_angle: Radian, slope_g: f64) -> Magnitude {
    let phi1 = phase_func(PhaseIndex::Phi1, phase_angle);
    let phi2 = phase_func(PhaseIndex::Phi2, phase_angle);
    abs_mag - 2.5 * ((1.0 - slope_g) * phi1 + slope_g * phi2).log10()
}

/// Angle between two geometry vectors, in radians.
///
/// The cosine is clamped to `[-1, 1]` so that nearly colinear vectors do not
/// produce `NaN` from rounding.
///
/// Return
/// ------
/// * The angle in `[0, π]`, or [`NeoError::DegenerateGeometry`] if one of the
///   vectors has zero length.
pub fn phase_angle(
    obj_to_observer: &Vector3<f64>,
    obj_to_sun: &Vector3<f64>,
) -> Result<Radian, NeoError> {
    let norm_product = obj_to_observer.norm() * obj_to_sun.norm();
    if norm_product == 0.0 {
        return Err(NeoError::DegenerateGeometry(
            "zero-length geometry vector".into(),
        ));
    }
    let cos_alpha = (obj_to_observer.dot(obj_to_sun) / norm_product).clamp(-1.0, 1.0);
    Ok(cos_alpha.acos())
}

/// Apparent magnitude from the H-G model and the observing geometry.
///
/// Arguments
/// ---------
/// * `abs_mag`: absolute magnitude H.
/// * `obj_to_observer`: vector from the object to the observer (AU).
/// * `obj_to_sun`: vector from the object to the illumination source (AU).
/// * `slope_g`: slope parameter G.
///
/// Return
/// ------
/// * `reduc_mag(H, α, G) + 5·log10(‖v1‖·‖v2‖)`.
/// * [`NeoError::DegenerateGeometry`] for a zero-length vector and
///   [`NeoError::PhaseAngleOutOfRange`] when the object sits exactly between the
///   Sun and the observer (α = π).
pub fn hg_app_mag(
    abs_mag: Magnitude,
    obj_to_observer: &Vector3<f64>,
    obj_to_sun: &Vector3<f64>,
    slope_g: f64,
) -> Result<Magnitude, NeoError> {
    let alpha = phase_angle(obj_to_observer, obj_to_sun)?;
    if alpha >= PI {
        return Err(NeoError::PhaseAngleOutOfRange(alpha));
    }
    let distance_term = 5.0 * (obj_to_observer.norm() * obj_to_sun.norm()).log10();
    Ok(reduc_mag(abs_mag, alpha, slope_g) + distance_term)
}

/// Diameter estimate (km) from the absolute magnitude and the geometric albedo.
pub fn diameter_from_abs_mag(abs_mag: Magnitude, albedo: f64) -> f64 {
    DIAMETER_CONSTANT_KM / albedo.sqrt() * 10f64.powf(-abs_mag / 5.0)
}

/// H-G photometric parameters of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HGModel {
    pub abs_mag: Magnitude,
    pub slope_g: f64,
}

impl HGModel {
    pub fn new(abs_mag: Magnitude, slope_g: Option<f64>) -> Self {
        HGModel {
            abs_mag,
            slope_g: slope_g.unwrap_or(DEFAULT_SLOPE_G),
        }
    }

    pub fn reduced_magnitude(&self, phase_angle: Radian) -> Magnitude {
        reduc_mag(self.abs_mag, phase_angle, self.slope_g)
    }

    pub fn apparent_magnitude(
        &self,
        obj_to_observer: &Vector3<f64>,
        obj_to_sun: &Vector3<f64>,
    ) -> Result<Magnitude, NeoError> {
        hg_app_mag(self.abs_mag, obj_to_observer, obj_to_sun, self.slope_g)
    }
}
