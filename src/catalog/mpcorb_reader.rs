//! # MPCORB flat-file reader
//!
//! Parses the **fixed-width MPCORB format** used by the Minor Planet Center for its orbit
//! files (`MPCORB.DAT`, `NEA.txt`, …) into [`NeoRecord`] values.
//!
//! ## Field layout (1-based columns)
//! -----------------
//! | Columns   | Field                                   |
//! |-----------|-----------------------------------------|
//! | 1–7       | Packed designation                      |
//! | 9–13      | Absolute magnitude H (may be blank)     |
//! | 15–19     | Slope parameter G (may be blank)        |
//! | 21–25     | Epoch, packed form                      |
//! | 27–35     | Mean anomaly (deg)                      |
//! | 38–46     | Argument of perihelion (deg)            |
//! | 49–57     | Longitude of the ascending node (deg)   |
//! | 60–68     | Inclination (deg)                       |
//! | 71–79     | Eccentricity                            |
//! | 81–91     | Mean daily motion (deg/day)             |
//! | 93–103    | Semi-major axis (AU)                    |
//! | 118–122   | Number of observations                  |
//! | 124–126   | Number of oppositions                   |
//! | 138–141   | r.m.s. residual (arcsec)                |
//! | 167–194   | Readable designation                    |
//!
//! Lines up to and including a dashed separator line (the `MPCORB.DAT` header) are
//! skipped, as are blank lines. Everything after column 103 is optional.
//!
//! ## Error Handling
//! -----------------
//! Line-level failures are described by [`ParseOrbError`] and surfaced as
//! [`NeoError::ParsingMpcorbError`] together with the 1-based line number.
use std::ops::Range;

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::{catalog::NeoRecord, neolab_errors::NeoError, time::packed_epoch_to_mjd};

/// Shortest line carrying all the orbital elements (up to the semi-major axis).
const MIN_LINE_LENGTH: usize = 103;

/// Line-level parsing errors for MPCORB records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseOrbError {
    #[error("The line is too short: {0} characters")]
    TooShortLine(usize),
    #[error("Invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("Invalid packed epoch: {0:?}")]
    InvalidEpoch(String),
}

/// Slice a fixed-width column, 0-based half-open byte range, trimmed.
///
/// Returns an empty string when the range falls outside the line or splits a
/// multi-byte character.
fn column(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    line.get(range.start.min(end)..end).unwrap_or("").trim()
}

fn required_f64(line: &str, range: Range<usize>, field: &'static str) -> Result<f64, ParseOrbError> {
    let value = column(line, range);
    value.parse().map_err(|_| ParseOrbError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn optional<T: std::str::FromStr>(
    line: &str,
    range: Range<usize>,
    field: &'static str,
) -> Result<Option<T>, ParseOrbError> {
    let value = column(line, range);
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ParseOrbError::InvalidField {
            field,
            value: value.to_string(),
        })
}

/// Parse a single **MPCORB** line into a [`NeoRecord`].
///
/// Arguments
/// -----------------
/// * `line` – one fixed-width record, at least 103 characters.
///
/// Return
/// ----------
/// * The parsed record, or a [`ParseOrbError`] naming the offending field.
pub fn parse_mpcorb_line(line: &str) -> Result<NeoRecord, ParseOrbError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.len() < MIN_LINE_LENGTH {
        return Err(ParseOrbError::TooShortLine(line.len()));
    }

    let designation = column(line, 0..7).to_string();
    if designation.is_empty() {
        return Err(ParseOrbError::InvalidField {
            field: "designation",
            value: designation,
        });
    }

    let packed_epoch = column(line, 20..25);
    let epoch = packed_epoch_to_mjd(packed_epoch)
        .map_err(|_| ParseOrbError::InvalidEpoch(packed_epoch.to_string()))?;

    let name = match column(line, 166..194) {
        "" => designation.clone(),
        readable => readable.to_string(),
    };

    Ok(NeoRecord {
        name,
        abs_mag: optional(line, 8..13, "absolute magnitude")?,
        slope_g: optional(line, 14..19, "slope parameter")?,
        epoch,
        mean_anomaly: required_f64(line, 26..35, "mean anomaly")?,
        periapsis_argument: required_f64(line, 37..46, "argument of perihelion")?,
        ascending_node: required_f64(line, 48..57, "ascending node")?,
        inclination: required_f64(line, 59..68, "inclination")?,
        eccentricity: required_f64(line, 70..79, "eccentricity")?,
        mean_motion: required_f64(line, 80..91, "mean motion")?,
        semi_major_axis: required_f64(line, 92..103, "semi-major axis")?,
        n_observations: optional(line, 117..122, "number of observations")?,
        n_oppositions: optional(line, 123..126, "number of oppositions")?,
        rms_residual: optional(line, 137..141, "rms residual")?,
        designation,
    })
}

/// Parse the full content of an MPCORB file.
///
/// Arguments
/// -----------------
/// * `content` – the file content, with or without the `MPCORB.DAT` header.
///
/// Return
/// ----------
/// * All the records in file order, or the first failure as
///   [`NeoError::ParsingMpcorbError`] with its 1-based line number.
pub fn parse_mpcorb(content: &str) -> Result<Vec<NeoRecord>, NeoError> {
    let lines: Vec<&str> = content.lines().collect();

    let first_data_line = lines
        .iter()
        .position(|l| l.starts_with("-----"))
        .map_or(0, |sep| sep + 1);

    lines
        .iter()
        .enumerate()
        .skip(first_data_line)
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(idx, l)| {
            parse_mpcorb_line(l).map_err(|source| NeoError::ParsingMpcorbError {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Read and parse an MPCORB file from disk.
pub fn read_mpcorb(path: &Utf8Path) -> Result<Vec<NeoRecord>, NeoError> {
    debug!(%path, "reading MPCORB file");
    let content = std::fs::read_to_string(path)?;
    let records = parse_mpcorb(&content)?;
    info!(%path, n_records = records.len(), "MPCORB file parsed");
    Ok(records)
}
