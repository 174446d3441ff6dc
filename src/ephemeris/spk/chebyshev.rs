//! # Chebyshev position segments (SPK type 2)
//!
//! A type 2 segment is a run of fixed-size records, each covering `intlen` seconds and
//! holding, as little-endian doubles,
//!
//! 1. `mid`, the record midpoint (TDB seconds past J2000),
//! 2. `radius`, its half-width in seconds,
//! 3. `n` Chebyshev coefficients for X, then Y, then Z (km),
//!
//! and closed by a four-word directory `(init, intlen, rsize, n_records)`.
//!
//! The position at `et` is `Σ c_k T_k(t)` with `t = (et - mid) / radius`.
use nalgebra::Vector3;

use super::daf::{read_words, Summary};
use crate::{constants::Kilometer, neolab_errors::NeoError};

/// SPK data type of Chebyshev position-only segments.
pub const CHEBYSHEV_POSITION_TYPE: i32 = 2;

/// NAIF code of the J2000 frame.
pub const J2000_FRAME: i32 = 1;

/// Trailing directory of a type 2 segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDirectory {
    /// Start of the first record, TDB seconds past J2000.
    pub init: f64,
    /// Time span of each record, in seconds.
    pub intlen: f64,
    /// Record size in double precision words.
    pub rsize: usize,
    pub n_records: usize,
}

impl SegmentDirectory {
    fn from_words(words: &[f64]) -> Result<Self, NeoError> {
        let [init, intlen, rsize, n_records] = words else {
            return Err(NeoError::InvalidSpkKernel("truncated segment directory".into()));
        };
        let directory = SegmentDirectory {
            init: *init,
            intlen: *intlen,
            rsize: *rsize as usize,
            n_records: *n_records as usize,
        };

        if directory.intlen <= 0.0
            || directory.n_records == 0
            || directory.rsize < 5
            || (directory.rsize - 2) % 3 != 0
        {
            return Err(NeoError::InvalidSpkKernel(format!(
                "inconsistent segment directory {directory:?}"
            )));
        }
        Ok(directory)
    }
}

/// One record of a type 2 segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl ChebyshevRecord {
    /// Split the `rsize` words of a record into midpoint, radius and the three coefficient sets.
    pub fn from_words(words: &[f64]) -> Self {
        let n_coeffs = words.len().saturating_sub(2) / 3;
        let coeffs = |axis: usize| words[2 + axis * n_coeffs..2 + (axis + 1) * n_coeffs].to_vec();
        ChebyshevRecord {
            mid: words[0],
            radius: words[1],
            x: coeffs(0),
            y: coeffs(1),
            z: coeffs(2),
        }
    }

    /// Position at `et` (TDB seconds past J2000), in km.
    ///
    /// The normalized time is clamped to `[-1, 1]`.
    pub fn position(&self, et: f64) -> Vector3<Kilometer> {
        let t = ((et - self.mid) / self.radius).clamp(-1.0, 1.0);

        // T_0 = 1, T_1 = t, T_n = 2 t T_{n-1} - T_{n-2}
        let mut polynomials = vec![0.0; self.x.len()];
        if let Some(first) = polynomials.first_mut() {
            *first = 1.0;
        }
        if polynomials.len() > 1 {
            polynomials[1] = t;
        }
        for degree in 2..polynomials.len() {
            polynomials[degree] = 2.0 * t * polynomials[degree - 1] - polynomials[degree - 2];
        }

        let series = |coeffs: &[f64]| -> f64 {
            coeffs.iter().zip(&polynomials).map(|(c, p)| c * p).sum()
        };
        Vector3::new(series(&self.x), series(&self.y), series(&self.z))
    }
}

/// A type 2 segment loaded in memory.
#[derive(Debug, Clone)]
pub struct ChebyshevSegment {
    pub summary: Summary,
    pub directory: SegmentDirectory,
    records: Vec<ChebyshevRecord>,
}

impl ChebyshevSegment {
    /// Decode the segment described by `summary` from the kernel bytes.
    ///
    /// Arguments
    /// ---------
    /// * `data`: the whole kernel
    /// * `summary`: the segment descriptor, must be a J2000 type 2 segment
    ///
    /// Return
    /// ------
    /// * the segment with every record decoded
    pub fn read(data: &[u8], summary: Summary) -> Result<Self, NeoError> {
        if summary.data_type != CHEBYSHEV_POSITION_TYPE {
            return Err(NeoError::InvalidSpkKernel(format!(
                "segment {} / {} has unsupported data type {}",
                summary.target, summary.center, summary.data_type
            )));
        }
        if summary.frame_id != J2000_FRAME {
            return Err(NeoError::InvalidSpkKernel(format!(
                "segment {} / {} is in frame {}",
                summary.target, summary.center, summary.frame_id
            )));
        }

        let final_addr = summary.final_addr as usize;
        let dir_addr = final_addr
            .checked_sub(3)
            .ok_or_else(|| NeoError::InvalidSpkKernel("segment ends before its directory".into()))?;
        let directory = SegmentDirectory::from_words(&read_words(data, dir_addr, 4)?)?;

        let n_words = directory.rsize * directory.n_records;
        if summary.initial_addr as usize + n_words > dir_addr {
            return Err(NeoError::InvalidSpkKernel(format!(
                "segment {} / {} records overflow its directory",
                summary.target, summary.center
            )));
        }

        let records = read_words(data, summary.initial_addr as usize, n_words)?
            .chunks_exact(directory.rsize)
            .map(ChebyshevRecord::from_words)
            .collect();

        Ok(ChebyshevSegment {
            summary,
            directory,
            records,
        })
    }

    /// Position at `et`, or `None` outside the segment coverage.
    pub fn position(&self, et: f64) -> Option<Vector3<Kilometer>> {
        if et < self.summary.start_et || et > self.summary.end_et {
            return None;
        }
        let index = ((et - self.directory.init) / self.directory.intlen).floor();
        let index = (index.max(0.0) as usize).min(self.records.len().saturating_sub(1));
        self.records.get(index).map(|record| record.position(et))
    }
}

#[cfg(test)]
mod chebyshev_test {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic_record() -> ChebyshevRecord {
        ChebyshevRecord::from_words(&[
            100.0, 50.0, // mid, radius
            1.0, 2.0, 3.0, // x
            -4.0, 0.0, 0.5, // y
            7.0, 0.0, 0.0, // z
        ])
    }

    #[test]
    fn test_record_layout() {
        let record = quadratic_record();
        assert_eq!(record.mid, 100.0);
        assert_eq!(record.radius, 50.0);
        assert_eq!(record.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(record.y, vec![-4.0, 0.0, 0.5]);
        assert_eq!(record.z, vec![7.0, 0.0, 0.0]);
    }

    #[test]
    fn test_chebyshev_series() {
        let record = quadratic_record();

        // t = 0.5 : T_1 = 0.5, T_2 = 2 t^2 - 1 = -0.5
        let p = record.position(125.0);
        assert_relative_eq!(p, Vector3::new(0.5, -4.25, 7.0), epsilon = 1e-12);

        // midpoint : T_1 = 0, T_2 = -1
        let p = record.position(100.0);
        assert_relative_eq!(p, Vector3::new(-2.0, -4.5, 7.0), epsilon = 1e-12);

        // clamped at the record edge
        assert_relative_eq!(record.position(1000.0), record.position(150.0), epsilon = 1e-12);
    }

    #[test]
    fn test_degree_five_matches_cosine_form() {
        // T_n(cos θ) = cos(n θ)
        let mut words = vec![0.0, 1.0];
        words.extend([0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        words.extend([0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        words.extend([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let record = ChebyshevRecord::from_words(&words);

        let theta: f64 = 0.7;
        let p = record.position(theta.cos());
        assert_relative_eq!(p.x, (5.0 * theta).cos(), epsilon = 1e-12);
        assert_relative_eq!(p.y, (3.0 * theta).cos(), epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_directory() {
        assert!(SegmentDirectory::from_words(&[0.0, 86400.0, 11.0, 3.0]).is_ok());
        assert!(SegmentDirectory::from_words(&[0.0, 86400.0, 10.0, 3.0]).is_err());
        assert!(SegmentDirectory::from_words(&[0.0, 0.0, 11.0, 3.0]).is_err());
        assert!(SegmentDirectory::from_words(&[0.0, 86400.0, 11.0]).is_err());
    }
}
