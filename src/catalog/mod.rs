//! # NEO catalog
//!
//! Everything needed to go from the Minor Planet Center publications to a local,
//! queryable catalog of near-Earth objects:
//!
//! - [`fetcher`](crate::catalog::fetcher) – downloads the catalog page and the orbit flat file,
//!   extracts the advertised object count.
//! - [`mpcorb_reader`](crate::catalog::mpcorb_reader) – parses the fixed-width MPCORB lines
//!   into [`NeoRecord`]s.
//! - [`store`](crate::catalog::store) – loads the records into SQLite, derives perihelion and
//!   aphelion columns and tags each row with its [`NeoClass`].
//!
//! ## Typical workflow
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use neolab::catalog::{mpcorb_reader::read_mpcorb, store::CatalogStore};
//!
//! let records = read_mpcorb(Utf8Path::new("NEA.txt")).unwrap();
//! let mut store = CatalogStore::open(Utf8Path::new("neo.sqlite")).unwrap();
//! store.create_schema().unwrap();
//! store.insert_records(&records).unwrap();
//! store.add_derived_columns().unwrap();
//! store.classify_all().unwrap();
//! println!("{:?}", store.count_by_class().unwrap());
//! ```

pub mod fetcher;
pub mod mpcorb_reader;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{AstronomicalUnit, Degree, Magnitude, MJD, RADEG},
    keplerian_element::KeplerianElements,
    orbit_class::{neo_class, NeoClass},
    photometry::HGModel,
};

/// One object of the NEO orbit catalog, as published in the MPCORB format.
///
/// Angles are kept in **degrees** as in the file; use
/// [`NeoRecord::keplerian_elements`] for a radian element set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoRecord {
    /// Packed designation (columns 1–7), primary key of the catalog
    pub designation: String,
    /// Readable designation, e.g. `(433) Eros`
    pub name: String,
    pub abs_mag: Option<Magnitude>,
    pub slope_g: Option<f64>,
    /// Epoch of the osculating elements, MJD (TT)
    pub epoch: MJD,
    pub mean_anomaly: Degree,
    pub periapsis_argument: Degree,
    pub ascending_node: Degree,
    pub inclination: Degree,
    pub eccentricity: f64,
    /// Mean daily motion (deg/day)
    pub mean_motion: Degree,
    pub semi_major_axis: AstronomicalUnit,
    pub n_observations: Option<u32>,
    pub n_oppositions: Option<u32>,
    pub rms_residual: Option<f64>,
}

impl NeoRecord {
    /// Perihelion distance `q = a(1 − e)` in AU.
    pub fn perihelion(&self) -> AstronomicalUnit {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Aphelion distance `Q = a(1 + e)` in AU.
    pub fn aphelion(&self) -> AstronomicalUnit {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    pub fn neo_class(&self) -> NeoClass {
        neo_class(self.semi_major_axis, self.perihelion(), self.aphelion())
    }

    /// Photometric model of the object, `None` when H is not published.
    pub fn hg_model(&self) -> Option<HGModel> {
        self.abs_mag.map(|h| HGModel::new(h, self.slope_g))
    }

    /// Heliocentric ecliptic J2000 element set in radians.
    pub fn keplerian_elements(&self) -> KeplerianElements {
        KeplerianElements {
            reference_epoch: self.epoch,
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination * RADEG,
            ascending_node_longitude: self.ascending_node * RADEG,
            periapsis_argument: self.periapsis_argument * RADEG,
            mean_anomaly: self.mean_anomaly * RADEG,
        }
    }
}

#[cfg(test)]
pub(crate) mod catalog_test {
    use super::*;

    pub(crate) fn apollo() -> NeoRecord {
        NeoRecord {
            designation: "01862".into(),
            name: "(1862) Apollo".into(),
            abs_mag: Some(16.07),
            slope_g: Some(0.09),
            epoch: 60800.0,
            mean_anomaly: 118.0531,
            periapsis_argument: 286.0251,
            ascending_node: 35.5627,
            inclination: 6.3531,
            eccentricity: 0.5599,
            mean_motion: 0.55133,
            semi_major_axis: 1.4702,
            n_observations: Some(5000),
            n_oppositions: Some(45),
            rms_residual: Some(0.49),
        }
    }

    #[test]
    fn test_derived_quantities() {
        let record = apollo();
        assert!((record.perihelion() - 0.64703502).abs() < 1e-8);
        assert!((record.aphelion() - 2.29336498).abs() < 1e-8);
        assert_eq!(record.neo_class(), NeoClass::Apollo);
    }

    #[test]
    fn test_hg_model() {
        let mut record = apollo();
        assert_eq!(record.hg_model(), Some(HGModel::new(16.07, Some(0.09))));
        record.slope_g = None;
        assert_eq!(record.hg_model().map(|m| m.slope_g), Some(0.15));
        record.abs_mag = None;
        assert_eq!(record.hg_model(), None);
    }

    #[test]
    fn test_keplerian_elements() {
        let kep = apollo().keplerian_elements();
        assert_eq!(kep.reference_epoch, 60800.0);
        assert!((kep.inclination - 6.3531_f64.to_radians()).abs() < 1e-12);
        assert!((kep.perihelion_distance() - apollo().perihelion()).abs() < 1e-15);
    }
}
