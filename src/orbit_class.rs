//! # Near-Earth object orbit classes
//!
//! Maps the semi-major axis `a`, the perihelion distance `q` and the aphelion distance `Q`
//! (all in AU) of an orbit to one of the four classical NEO groups:
//!
//! | Class    | Condition                      |
//! |----------|--------------------------------|
//! | `Amor`   | `a > 1` and `1.017 < q < 1.3`  |
//! | `Apollo` | `a > 1` and `q < 1.017`        |
//! | `Aten`   | `a < 1` and `Q > 0.983`        |
//! | `Atira`  | `a < 1` and `Q < 0.983`        |
//!
//! Anything else, including values lying exactly on one of the thresholds, is `Other`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{AstronomicalUnit, EARTH_APHELION, EARTH_PERIHELION, NEO_PERIHELION_LIMIT},
    neolab_errors::NeoError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeoClass {
    Amor,
    Apollo,
    Aten,
    Atira,
    Other,
}

impl NeoClass {
    pub const ALL: [NeoClass; 5] = [
        NeoClass::Amor,
        NeoClass::Apollo,
        NeoClass::Aten,
        NeoClass::Atira,
        NeoClass::Other,
    ];

    /// `true` for the four near-Earth groups.
    pub fn is_neo(&self) -> bool {
        !matches!(self, NeoClass::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NeoClass::Amor => "Amor",
            NeoClass::Apollo => "Apollo",
            NeoClass::Aten => "Aten",
            NeoClass::Atira => "Atira",
            NeoClass::Other => "Other",
        }
    }
}

impl fmt::Display for NeoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NeoClass {
    type Err = NeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeoClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NeoError::InvalidOrbitClass(s.to_string()))
    }
}

/// Classify an orbit from its semi-major axis, perihelion and aphelion distances.
///
/// Arguments
/// ---------
/// * `semi_major_axis`: `a` in AU.
/// * `perihelion`: `q = a(1 − e)` in AU.
/// * `aphelion`: `Q = a(1 + e)` in AU.
///
/// Return
/// ------
/// * The [`NeoClass`] of the orbit. All comparisons are strict, so an orbit sitting
///   exactly on a boundary is classified as [`NeoClass::Other`].
pub fn neo_class(
    semi_major_axis: AstronomicalUnit,
    perihelion: AstronomicalUnit,
    aphelion: AstronomicalUnit,
) -> NeoClass {
    if semi_major_axis > 1.0 {
        if perihelion > EARTH_APHELION && perihelion < NEO_PERIHELION_LIMIT {
            return NeoClass::Amor;
        }
        if perihelion < EARTH_APHELION {
            return NeoClass::Apollo;
        }
    } else if semi_major_axis < 1.0 {
        if aphelion > EARTH_PERIHELION {
            return NeoClass::Aten;
        }
        if aphelion < EARTH_PERIHELION {
            return NeoClass::Atira;
        }
    }
    NeoClass::Other
}
