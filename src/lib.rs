//! Near-Earth-object catalog analysis: MPC catalog download and parsing, SQLite
//! loading, orbit classification, H-G photometry and apparent-magnitude ephemerides.
pub mod catalog;
pub mod constants;
pub mod env_state;
pub mod ephemeris;
pub mod kepler;
pub mod keplerian_element;
pub mod neolab_errors;
pub mod orbit_class;
pub mod photometry;
pub mod time;

pub use catalog::NeoRecord;
pub use neolab_errors::NeoError;
pub use orbit_class::{neo_class, NeoClass};
pub use photometry::{hg_app_mag, phase_func, reduc_mag, PhaseIndex};
