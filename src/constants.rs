//! # Constants and type definitions for neolab
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **orbit-class thresholds** and the **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, Gaussian gravitational constant, obliquity)
//! - Unit conversions (degrees ↔ radians, JD ↔ MJD, AU ↔ km)
//! - Photometric defaults of the IAU H-G model
//! - Distance thresholds delimiting the NEO orbit classes

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Gaussian gravitational constant k (AU^(3/2) / day)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// k², the heliocentric gravitational parameter in AU³/day²
pub const GAUSS_GRAV_SQUARED: f64 = GAUSS_GRAV * GAUSS_GRAV;

/// Mean obliquity of the ecliptic at J2000 (IAU 1976), in arcseconds
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84381.448;

/// Days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

// -------------------------------------------------------------------------------------------------
// Photometry
// -------------------------------------------------------------------------------------------------

/// Conventional slope parameter G of the H-G model when none has been measured
pub const DEFAULT_SLOPE_G: f64 = 0.15;

/// Diameter / albedo / absolute magnitude constant (km), `D = 1329 / √p · 10^(-H/5)`
pub const DIAMETER_CONSTANT_KM: f64 = 1329.0;

// -------------------------------------------------------------------------------------------------
// Orbit classification thresholds (AU)
// -------------------------------------------------------------------------------------------------

/// Earth aphelion distance, lower bound of the Amor perihelion range
pub const EARTH_APHELION: f64 = 1.017;

/// Earth perihelion distance, splits the Aten and Atira classes
pub const EARTH_PERIHELION: f64 = 0.983;

/// Perihelion limit of a near-Earth object
pub const NEO_PERIHELION_LIMIT: f64 = 1.3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Magnitude (absolute, reduced or apparent)
pub type Magnitude = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
