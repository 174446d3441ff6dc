//! # DAF container
//!
//! NAIF SPK kernels are stored as a DAF (Double precision Array File): a sequence of
//! 1024-byte records where
//!
//! * record 1 is the **file record** ([`DafHeader`]): format identifier, summary layout
//!   (`ND` doubles and `NI` integers per summary) and the first/last summary record;
//! * summary records form a linked list, each holding up to `NSUM` array summaries
//!   ([`Summary`]) after three control words (next, previous, count);
//! * arrays are addressed in **1-based double precision words** from the start of the file.
//!
//! Only little-endian (`LTL-IEEE`) kernels with the SPK layout `ND = 2`, `NI = 6` are
//! accepted, which covers every planetary kernel distributed by NAIF.
use nom::{
    bytes::complete::take,
    multi::count,
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::neolab_errors::NeoError;

pub const RECORD_BYTES: usize = 1024;
const WORD_BYTES: usize = 8;

/// File record of a DAF kernel, trimmed of its padding.
#[derive(Debug, Clone, PartialEq)]
pub struct DafHeader {
    /// Format identifier, `DAF/SPK` for ephemeris kernels.
    pub idword: String,
    pub internal_filename: String,
    /// Number of double precision components of a summary.
    pub nd: i32,
    /// Number of integer components of a summary.
    pub ni: i32,
    /// Record number of the first summary record.
    pub fward: i32,
    /// Record number of the last summary record.
    pub bward: i32,
    /// First free address of the file.
    pub free: i32,
    /// Binary format of the numbers, e.g. `LTL-IEEE`.
    pub locfmt: String,
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

impl DafHeader {
    /// Parse the leading bytes of the file record.
    ///
    /// Arguments
    /// ---------
    /// * `input`: the first record of the file
    ///
    /// Return
    /// ------
    /// * the remaining input and the decoded header
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DafHeader {
                idword: trimmed(idword),
                internal_filename: trimmed(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: trimmed(locfmt),
            },
        ))
    }

    /// Decode the file record and check it describes a little-endian SPK kernel.
    pub fn read(data: &[u8]) -> Result<Self, NeoError> {
        let record = record(data, 1)?;
        let (_, header) = Self::parse(record)
            .map_err(|_| NeoError::InvalidSpkKernel("unreadable file record".into()))?;

        if header.idword != "DAF/SPK" {
            return Err(NeoError::InvalidSpkKernel(format!(
                "not an SPK kernel (id word {:?})",
                header.idword
            )));
        }
        if header.locfmt != "LTL-IEEE" {
            return Err(NeoError::InvalidSpkKernel(format!(
                "unsupported binary format {:?}",
                header.locfmt
            )));
        }
        if header.nd != 2 || header.ni != 6 {
            return Err(NeoError::InvalidSpkKernel(format!(
                "unexpected summary layout ND = {}, NI = {}",
                header.nd, header.ni
            )));
        }
        Ok(header)
    }

    /// Size of one summary in double precision words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

/// Descriptor of one SPK segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Coverage start, TDB seconds past J2000.
    pub start_et: f64,
    /// Coverage end, TDB seconds past J2000.
    pub end_et: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    /// First address of the segment data.
    pub initial_addr: i32,
    /// Last address of the segment data.
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_et) = le_f64(input)?;
        let (input, end_et) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_et,
                end_et,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }
}

/// The 1024 bytes of record `number` (1-based).
fn record(data: &[u8], number: usize) -> Result<&[u8], NeoError> {
    number
        .checked_sub(1)
        .and_then(|index| data.get(index * RECORD_BYTES..(index + 1) * RECORD_BYTES))
        .ok_or_else(|| NeoError::InvalidSpkKernel(format!("record {number} out of file")))
}

/// Walk the linked list of summary records and collect every segment descriptor.
///
/// Arguments
/// ---------
/// * `data`: the whole kernel
/// * `header`: its decoded file record
///
/// Return
/// ------
/// * the summaries in file order
pub fn read_summaries(data: &[u8], header: &DafHeader) -> Result<Vec<Summary>, NeoError> {
    let summary_bytes = header.summary_words() * WORD_BYTES;
    let max_records = data.len() / RECORD_BYTES;

    let mut summaries = Vec::new();
    let mut next = header.fward.max(0) as usize;
    let mut visited = 0;

    while next != 0 {
        visited += 1;
        if visited > max_records {
            return Err(NeoError::InvalidSpkKernel("cyclic summary records".into()));
        }

        let block = record(data, next)?;
        let (body, control) = count(le_f64::<_, nom::error::Error<&[u8]>>, 3)(block)
            .map_err(|_| NeoError::InvalidSpkKernel("unreadable summary record".into()))?;
        let nsum = control[2] as usize;

        for i in 0..nsum {
            let bytes = body
                .get(i * summary_bytes..(i + 1) * summary_bytes)
                .ok_or_else(|| NeoError::InvalidSpkKernel(format!("{nsum} summaries in one record")))?;
            let (_, summary) = Summary::parse(bytes)
                .map_err(|_| NeoError::InvalidSpkKernel("unreadable summary".into()))?;
            summaries.push(summary);
        }

        next = control[0] as usize;
    }

    Ok(summaries)
}

/// Read `n` double precision words starting at the 1-based DAF address `addr`.
pub fn read_words(data: &[u8], addr: usize, n: usize) -> Result<Vec<f64>, NeoError> {
    let out_of_file =
        || NeoError::InvalidSpkKernel(format!("words {addr}..{} out of file", addr + n));
    let start = addr.checked_sub(1).ok_or_else(out_of_file)? * WORD_BYTES;
    let bytes = data
        .get(start..start + n * WORD_BYTES)
        .ok_or_else(out_of_file)?;

    let (_, words) = count(le_f64::<_, nom::error::Error<&[u8]>>, n)(bytes).map_err(|_| out_of_file())?;
    Ok(words)
}

#[cfg(test)]
pub(crate) mod daf_test {
    use super::*;

    /// File record of a little-endian SPK kernel whose summaries start at record `fward`.
    pub(crate) fn file_record(fward: i32, free: i32) -> Vec<u8> {
        let mut record = Vec::with_capacity(RECORD_BYTES);
        record.extend_from_slice(b"DAF/SPK ");
        record.extend_from_slice(&2i32.to_le_bytes());
        record.extend_from_slice(&6i32.to_le_bytes());
        record.extend_from_slice(format!("{:<60}", "NEOLAB TEST KERNEL").as_bytes());
        record.extend_from_slice(&fward.to_le_bytes());
        record.extend_from_slice(&fward.to_le_bytes());
        record.extend_from_slice(&free.to_le_bytes());
        record.extend_from_slice(b"LTL-IEEE");
        record.resize(RECORD_BYTES, 0);
        record
    }

    /// Summary record holding `summaries`, followed by no other summary record.
    pub(crate) fn summary_record(summaries: &[Summary]) -> Vec<u8> {
        let mut record = Vec::with_capacity(RECORD_BYTES);
        for control in [0.0, 0.0, summaries.len() as f64] {
            record.extend_from_slice(&f64::to_le_bytes(control));
        }
        for s in summaries {
            record.extend_from_slice(&s.start_et.to_le_bytes());
            record.extend_from_slice(&s.end_et.to_le_bytes());
            for value in [
                s.target,
                s.center,
                s.frame_id,
                s.data_type,
                s.initial_addr,
                s.final_addr,
            ] {
                record.extend_from_slice(&value.to_le_bytes());
            }
        }
        record.resize(RECORD_BYTES, 0);
        record
    }

    fn earth_summary() -> Summary {
        Summary {
            start_et: -1e9,
            end_et: 1e9,
            target: 399,
            center: 3,
            frame_id: 1,
            data_type: 2,
            initial_addr: 385,
            final_addr: 400,
        }
    }

    #[test]
    fn test_parse_file_record() {
        let data = file_record(2, 401);
        let header = DafHeader::read(&data).unwrap();
        assert_eq!(
            header,
            DafHeader {
                idword: "DAF/SPK".into(),
                internal_filename: "NEOLAB TEST KERNEL".into(),
                nd: 2,
                ni: 6,
                fward: 2,
                bward: 2,
                free: 401,
                locfmt: "LTL-IEEE".into(),
            }
        );
        assert_eq!(header.summary_words(), 5);
    }

    #[test]
    fn test_reject_foreign_files() {
        let mut data = file_record(2, 401);
        data[..8].copy_from_slice(b"DAF/PCK ");
        assert!(matches!(
            DafHeader::read(&data),
            Err(NeoError::InvalidSpkKernel(_))
        ));

        let mut data = file_record(2, 401);
        data[88..96].copy_from_slice(b"BIG-IEEE");
        assert!(matches!(
            DafHeader::read(&data),
            Err(NeoError::InvalidSpkKernel(_))
        ));

        assert!(DafHeader::read(b"DAF/SPK ").is_err());
    }

    #[test]
    fn test_read_summaries() {
        let mut data = file_record(2, 401);
        data.extend(summary_record(&[earth_summary()]));

        let header = DafHeader::read(&data).unwrap();
        assert_eq!(read_summaries(&data, &header).unwrap(), vec![earth_summary()]);
    }

    #[test]
    fn test_summary_record_out_of_file() {
        let data = file_record(5, 401);
        let header = DafHeader::read(&data).unwrap();
        assert!(matches!(
            read_summaries(&data, &header),
            Err(NeoError::InvalidSpkKernel(_))
        ));
    }

    #[test]
    fn test_read_words() {
        let mut data = Vec::new();
        for value in [1.5f64, -2.0, 3.25] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(read_words(&data, 2, 2).unwrap(), vec![-2.0, 3.25]);
        assert!(read_words(&data, 3, 2).is_err());
        assert!(read_words(&data, 0, 1).is_err());
    }
}
