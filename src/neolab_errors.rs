use thiserror::Error;

use crate::catalog::mpcorb_reader::ParseOrbError;

#[derive(Error, Debug)]
pub enum NeoError {
    #[error("Invalid phase function index: {0} (expected 1 or 2)")]
    InvalidPhaseIndex(u8),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Phase angle out of range [0, π): {0} rad")]
    PhaseAngleOutOfRange(f64),

    #[error("Absolute magnitude is missing for object {0}")]
    MissingAbsoluteMagnitude(String),

    #[error("Unsupported orbit for two-body propagation: eccentricity = {0}")]
    UnsupportedOrbit(f64),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Base dir creation error for the data directory: {0}")]
    UnableToCreateBaseDir(String),

    #[error("Object count not found in catalog page")]
    ObjectCountNotFound,

    #[error("Invalid regular expression: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Error during the MPCORB parsing at line {line}: {source}")]
    ParsingMpcorbError { line: usize, source: ParseOrbError },

    #[error("Invalid packed epoch: {0}")]
    InvalidPackedEpoch(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid orbit class: {0}")]
    InvalidOrbitClass(String),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("CSV deserialization error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unexpected Horizons response: {0}")]
    HorizonsResponseError(String),

    #[error("Epoch not available in the ephemeris table: MJD {0}")]
    EpochNotAvailable(f64),

    #[error("Object not found in catalog: {0}")]
    ObjectNotFound(String),

    #[error("Catalog database not found: {0}, load the catalog first")]
    CatalogNotFound(String),

    #[error("Invalid SPK kernel: {0}")]
    InvalidSpkKernel(String),

    #[error("No SPK segment for target {target} relative to center {center}")]
    SpkSegmentNotFound { target: i32, center: i32 },
}

impl PartialEq for NeoError {
    fn eq(&self, other: &Self) -> bool {
        use NeoError::*;
        match (self, other) {
            (InvalidPhaseIndex(a), InvalidPhaseIndex(b)) => a == b,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (PhaseAngleOutOfRange(a), PhaseAngleOutOfRange(b)) => a == b,
            (MissingAbsoluteMagnitude(a), MissingAbsoluteMagnitude(b)) => a == b,
            (UnsupportedOrbit(a), UnsupportedOrbit(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (InvalidUrl(a), InvalidUrl(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (
                ParsingMpcorbError {
                    line: la,
                    source: sa,
                },
                ParsingMpcorbError {
                    line: lb,
                    source: sb,
                },
            ) => la == lb && sa == sb,
            (InvalidPackedEpoch(a), InvalidPackedEpoch(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidOrbitClass(a), InvalidOrbitClass(b)) => a == b,
            (HorizonsResponseError(a), HorizonsResponseError(b)) => a == b,
            (EpochNotAvailable(a), EpochNotAvailable(b)) => a == b,
            (ObjectNotFound(a), ObjectNotFound(b)) => a == b,
            (CatalogNotFound(a), CatalogNotFound(b)) => a == b,
            (InvalidSpkKernel(a), InvalidSpkKernel(b)) => a == b,
            (
                SpkSegmentNotFound { target: t1, center: c1 },
                SpkSegmentNotFound { target: t2, center: c2 },
            ) => t1 == t2 && c1 == c2,

            // foreign errors are not comparable: same variant means equal
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (ReqwestError(_), ReqwestError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (RegexError(_), RegexError(_)) => true,
            (SqliteError(_), SqliteError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (ObjectCountNotFound, ObjectCountNotFound) => true,

            _ => false,
        }
    }
}
