use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::{constants::MJD, neolab_errors::NeoError};

/// Transformation from date in the format YYYY-MM-ddTHH:mm:ss (UTC) to modified julian date (MJD)
///
/// Argument
/// --------
/// * `date`: a date in the format YYYY-MM-ddTHH:mm:ss, optionally suffixed with a time scale
///
/// Return
/// ------
/// * the input date as MJD in the TT time scale
pub fn date_to_mjd(date: &str) -> Result<MJD, NeoError> {
    Epoch::from_str(date.trim())
        .map(|epoch| epoch.to_mjd_tt_days())
        .map_err(|_| NeoError::InvalidDate(date.to_string()))
}

/// Transformation from modified julian date (MJD) in julian date (JD)
///
/// Argument
/// --------
/// * `mjd`: a slice of MJD
///
/// Return
/// ------
/// * a vector of jd
pub fn mjd_to_jd(mjd: &[f64]) -> Vec<f64> {
    mjd.iter()
        .map(|x| Epoch::from_mjd_in_time_scale(*x, TimeScale::TT).to_jde_tt_days())
        .collect()
}

/// Transformation from julian date (JD) in modified julian date (MJD)
///
/// Argument
/// --------
/// * `jd`: a slice of JD
///
/// Return
/// ------
/// * a vector of MJD
pub fn jd_to_mjd(jd: &[f64]) -> Vec<f64> {
    jd.iter()
        .map(|x| Epoch::from_jde_in_time_scale(*x, TimeScale::TT).to_mjd_tt_days())
        .collect()
}

/// Decode one character of a packed MPC date (`1`–`9`, then `A` = 10 … `V` = 31).
fn unpack_digit(c: char) -> Option<u8> {
    match c {
        '1'..='9' => Some(c as u8 - b'0'),
        'A'..='V' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}

/// Transformation from a packed MPC epoch (e.g. `K2555` = 2025-05-05) to MJD (TT, 0h)
///
/// Argument
/// --------
/// * `packed`: five characters, century letter (`I`, `J`, `K`), two-digit year,
///   packed month, packed day
///
/// Return
/// ------
/// * the epoch as MJD in the TT time scale
pub fn packed_epoch_to_mjd(packed: &str) -> Result<MJD, NeoError> {
    let invalid = || NeoError::InvalidPackedEpoch(packed.to_string());

    let chars: Vec<char> = packed.trim().chars().collect();
    if chars.len() != 5 {
        return Err(invalid());
    }

    let century = match chars[0] {
        'I' => 1800,
        'J' => 1900,
        'K' => 2000,
        _ => return Err(invalid()),
    };
    let decade = chars[1].to_digit(10).ok_or_else(invalid)?;
    let unit = chars[2].to_digit(10).ok_or_else(invalid)?;
    let year = century + (decade * 10 + unit) as i32;

    let month = unpack_digit(chars[3]).filter(|m| *m <= 12).ok_or_else(invalid)?;
    let day = unpack_digit(chars[4]).ok_or_else(invalid)?;

    let epoch = Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::TT)
        .map_err(|_| invalid())?;
    Ok(epoch.to_mjd_tt_days())
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_packed_epoch_to_mjd() {
        assert_relative_eq!(packed_epoch_to_mjd("K2555").unwrap(), 60800.0, epsilon = 1e-9);
        assert_relative_eq!(packed_epoch_to_mjd("J981A").unwrap(), 50823.0, epsilon = 1e-9);
        assert_relative_eq!(packed_epoch_to_mjd("K00C1").unwrap(), 51879.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_packed_epoch() {
        assert_eq!(
            packed_epoch_to_mjd("Z2555"),
            Err(NeoError::InvalidPackedEpoch("Z2555".into()))
        );
        assert!(packed_epoch_to_mjd("K25D5").is_err());
        assert!(packed_epoch_to_mjd("K252W").is_err());
        assert!(packed_epoch_to_mjd("K255").is_err());
    }

    #[test]
    fn test_jd_mjd() {
        let jd = mjd_to_jd(&[60800.0]);
        assert_relative_eq!(jd[0], 2460800.5, epsilon = 1e-8);
        let mjd = jd_to_mjd(&jd);
        assert_relative_eq!(mjd[0], 60800.0, epsilon = 1e-8);
    }

    #[test]
    fn test_jd_to_mjd_fractional_day() {
        let mjd = jd_to_mjd(&[2459400.032916666, 2460672.574629629]);
        assert_relative_eq!(mjd[0], 59399.532916666, epsilon = 1e-8);
        assert_relative_eq!(mjd[1], 60672.074629629, epsilon = 1e-8);
    }

    #[test]
    fn test_date_to_mjd() {
        let mjd = date_to_mjd("2025-05-05T00:00:00 TT").unwrap();
        assert_relative_eq!(mjd, 60800.0, epsilon = 1e-8);
        assert!(date_to_mjd("not a date").is_err());
    }
}
