//! # Ephemeris glue
//!
//! Heliocentric positions of the Earth and of catalog objects, chained into the
//! observing geometry needed by the photometric model.
//!
//! Every position handled here is **heliocentric, ecliptic J2000, in AU**.
//!
//! Three Earth sources implement [`EphemerisProvider`]:
//!
//! - [`horizons::HorizonsEphemeris`]: JPL Horizons vector tables fetched for an explicit
//!   list of epochs (network);
//! - [`spk::SpkEphemeris`]: a JPL planetary kernel (DE44x, NAIF SPK format) read locally,
//!   downloaded once into the cache;
//! - [`mean_earth::MeanEarthEphemeris`]: Earth–Moon barycenter from mean orbital elements
//!   (offline, accurate to a few 1e-4 AU).
//!
//! ```rust
//! use neolab::ephemeris::{mean_earth::MeanEarthEphemeris, EphemerisProvider};
//!
//! let earth = MeanEarthEphemeris.earth_position(60800.0).unwrap();
//! assert!((earth.norm() - 1.0).abs() < 0.02);
//! ```
use nalgebra::Vector3;

use crate::{constants::MJD, neolab_errors::NeoError};

pub mod frames;
pub mod geometry;
pub mod horizons;
pub mod mean_earth;
pub mod spk;

/// Source of the heliocentric Earth position.
pub trait EphemerisProvider {
    /// Heliocentric position of the Earth at `mjd` (TT), ecliptic J2000, AU.
    fn earth_position(&self, mjd: MJD) -> Result<Vector3<f64>, NeoError>;
}
