//! # JPL Horizons vector tables
//!
//! Requests heliocentric state-vector tables of a solar-system body (the Earth, NAIF id
//! `399`, by default) from the JPL Horizons API and turns them into [`PosRecord`]s.
//!
//! The request asks for positions in **kilometers** in the **ICRF** (equatorial J2000)
//! frame, centred on the Sun (`500@10`), at a list of MJD epochs. Positions are then
//! converted to **AU** and rotated to the **ecliptic J2000** frame of the catalog orbits.
//!
//! Only the data block between the `$$SOE` and `$$EOE` markers is used; it is read as a
//! header-less CSV table `JDTDB, Calendar Date (TDB), X, Y, Z`.
use itertools::Itertools;
use nalgebra::Vector3;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::{
    constants::{JDTOMJD, MJD},
    env_state::NeoEnv,
    ephemeris::{
        frames::{equatorial_to_ecliptic, km_to_au},
        EphemerisProvider,
    },
    neolab_errors::NeoError,
};

/// Two epochs closer than this (days) are considered the same table row.
const EPOCH_TOLERANCE: f64 = 1e-6;

static DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$SOE\s*\n(.*?)\n?\s*\$\$EOE").expect("static regex"));

/// Contains the informations from the JPL Horizons vector state query
/// x,y,z are the components of the position vector at the time contained in the jd and date field
#[derive(Debug, serde::Deserialize, PartialEq)]
pub struct PosRecord {
    pub jd: f64,
    pub date: String,
    pub x: f64, // km
    pub y: f64, // km
    pub z: f64, // km
}

impl PosRecord {
    pub fn pos_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn mjd(&self) -> MJD {
        self.jd - JDTOMJD
    }

    /// Position in AU, ecliptic J2000.
    pub fn ecliptic_au(&self) -> Vector3<f64> {
        equatorial_to_ecliptic(&km_to_au(&self.pos_vector()))
    }
}

fn mjd_tlist(mjd_list: &[f64]) -> String {
    mjd_list.iter().map(|mjd| format!("'{mjd}'")).join(" ")
}

/// Query parameters of a Horizons heliocentric vector table.
fn vector_query(command: &str, mjd_list: &[f64]) -> Vec<(&'static str, String)> {
    vec![
        ("format", "text".into()),
        ("COMMAND", format!("'{command}'")),
        ("OBJ_DATA", "'NO'".into()),
        ("MAKE_EPHEM", "'YES'".into()),
        ("EPHEM_TYPE", "'VECTORS'".into()),
        ("CENTER", "'500@10'".into()),
        ("TLIST_TYPE", "'MJD'".into()),
        ("TLIST", mjd_tlist(mjd_list)),
        ("CSV_FORMAT", "'YES'".into()),
        ("REF_SYSTEM", "'ICRF'".into()),
        ("REF_PLANE", "'FRAME'".into()),
        ("OUT_UNITS", "'KM-S'".into()),
        ("VEC_TABLE", "'1'".into()),
    ]
}

/// Request the JPL HORIZONS API for the position of `command` with respect to the Sun.
///
/// Argument
/// --------
/// * `env`: the environment holding the HTTP client and the Horizons URL
/// * `command`: Horizons target, e.g. `"399"` for the Earth
/// * `mjd_list`: a list of date in modified julian date format (MJD)
///
/// Return
/// ------
/// * The JPL API raw response
pub fn request_vector(env: &NeoEnv, command: &str, mjd_list: &[f64]) -> Result<String, NeoError> {
    let query = vector_query(command, mjd_list);
    let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    debug!(command, n_epochs = mjd_list.len(), "Horizons vector request");
    env.get_with_query(&env.config.horizons_url, &params)
}

/// Parse the JPL raw response and return the rows of the vector table.
///
/// Argument
/// --------
/// * `jpl_response`: the raw JPL response from the API
///
/// Return
/// ------
/// * a vector of PosRecord, or [`NeoError::HorizonsResponseError`] if the response
///   carries no `$$SOE … $$EOE` block (Horizons reports its errors as plain text).
pub fn deserialize_vector(jpl_response: &str) -> Result<Vec<PosRecord>, NeoError> {
    let data = DATA_RE
        .captures(jpl_response)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            let reason = jpl_response
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty() && !l.starts_with('*'))
                .unwrap_or("empty response");
            NeoError::HorizonsResponseError(reason.to_string())
        })?
        .as_str();

    // The trailing ',' of each row would read as an extra empty column.
    let table = data
        .lines()
        .map(|l| l.trim().trim_end_matches(','))
        .filter(|l| !l.is_empty())
        .join("\n");

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let records = csv_reader
        .deserialize::<PosRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Earth positions from a Horizons vector table fetched once for a set of epochs.
#[derive(Debug, Clone)]
pub struct HorizonsEphemeris {
    table: Vec<(MJD, Vector3<f64>)>,
}

impl HorizonsEphemeris {
    /// Fetch the Earth positions at every epoch of `mjd_list`.
    pub fn fetch(env: &NeoEnv, mjd_list: &[f64]) -> Result<Self, NeoError> {
        let response = request_vector(env, "399", mjd_list)?;
        let ephem = Self::from_response(&response)?;
        info!(n_epochs = ephem.table.len(), "Horizons Earth table received");
        Ok(ephem)
    }

    /// Build the table from an already downloaded Horizons response.
    pub fn from_response(response: &str) -> Result<Self, NeoError> {
        let table = deserialize_vector(response)?
            .iter()
            .map(|record| (record.mjd(), record.ecliptic_au()))
            .collect();
        Ok(HorizonsEphemeris { table })
    }

    pub fn epochs(&self) -> impl Iterator<Item = MJD> + '_ {
        self.table.iter().map(|(mjd, _)| *mjd)
    }
}

impl EphemerisProvider for HorizonsEphemeris {
    fn earth_position(&self, mjd: MJD) -> Result<Vector3<f64>, NeoError> {
        self.table
            .iter()
            .find(|(epoch, _)| (epoch - mjd).abs() < EPOCH_TOLERANCE)
            .map(|(_, position)| *position)
            .ok_or(NeoError::EpochNotAvailable(mjd))
    }
}

#[cfg(test)]
mod horizons_test {
    use super::*;
    use crate::constants::AU;
    use approx::assert_relative_eq;

    const FAKE_JPL: &str = "
Reference frame : ICRF
*******************************************************************************
            JDTDB,            Calendar Date (TDB),                      X,                      Y,                      Z,
**************************************************************************************************************************
$$SOE
2459400.032916666, A.D. 2021-Jul-04 12:47:24.0000,  3.284671599498844E+07, -1.362610227396614E+08, -5.906658005587431E+07,
2460672.574629629, A.D. 2024-Dec-28 01:47:28.0000, -1.657117178224520E+07,  1.341237040932186E+08,  5.814121946213380E+07,
$$EOE
**************************************************************************************************************************
";

    #[test]
    fn test_mjd_tlist() {
        assert_eq!(mjd_tlist(&[60800.0, 60800.5]), "'60800' '60800.5'");
    }

    #[test]
    fn test_deserialize_vector() {
        let records = deserialize_vector(FAKE_JPL).unwrap();
        assert_eq!(
            records,
            vec![
                PosRecord {
                    jd: 2459400.032916666,
                    date: "A.D. 2021-Jul-04 12:47:24.0000".into(),
                    x: 3.284671599498844E+07,
                    y: -1.362610227396614E+08,
                    z: -5.906658005587431E+07,
                },
                PosRecord {
                    jd: 2460672.574629629,
                    date: "A.D. 2024-Dec-28 01:47:28.0000".into(),
                    x: -1.657117178224520E+07,
                    y: 1.341237040932186E+08,
                    z: 5.814121946213380E+07,
                }
            ]
        );
        assert_relative_eq!(records[0].mjd(), 59399.532916666, epsilon = 1e-6);
    }

    #[test]
    fn test_horizons_error_message() {
        let response = "\nCannot interpret date. Type \"?!\" or try YYYY-MMM-DD format.\n";
        assert_eq!(
            deserialize_vector(response),
            Err(NeoError::HorizonsResponseError(
                "Cannot interpret date. Type \"?!\" or try YYYY-MMM-DD format.".into()
            ))
        );
    }

    #[test]
    fn test_earth_position_from_table() {
        let ephem = HorizonsEphemeris::from_response(FAKE_JPL).unwrap();
        let earth = ephem.earth_position(59399.532916666).unwrap();

        // rotation and unit change keep the heliocentric distance
        let record = &deserialize_vector(FAKE_JPL).unwrap()[0];
        assert_relative_eq!(earth.norm(), record.pos_vector().norm() / AU, epsilon = 1e-12);
        // the Earth stays close to the ecliptic plane
        assert!(earth.z.abs() < 1e-3);

        assert_eq!(
            ephem.earth_position(60000.0),
            Err(NeoError::EpochNotAvailable(60000.0))
        );
    }

    #[test]
    #[ignore]
    fn test_horizons_request() {
        let env = NeoEnv::default();
        let ephem = HorizonsEphemeris::fetch(&env, &[60800.0]).unwrap();
        let earth = ephem.earth_position(60800.0).unwrap();
        assert!((earth.norm() - 1.0).abs() < 0.02);
    }
}
