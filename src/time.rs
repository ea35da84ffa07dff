use hifitime::{Epoch, TimeScale, Unit};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::catalog_errors::CatalogError;
use crate::constants::{JulianDay, Second, J2000_JD, SECONDS_PER_DAY};

static CALENDAR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([-+]?\d{1,6})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?\s*(?:TDB)?\s*$",
    )
    .expect("calendar date pattern is valid")
});

/// Convert a TDB Julian Date to seconds since J2000.0
///
/// Arguments
/// ---------
/// * `jd`: Julian Date in the TDB time scale
///
/// Return
/// ------
/// * seconds elapsed since 2000-01-01 12:00:00 TDB
pub fn jd_to_tdb_seconds(jd: JulianDay) -> Second {
    (jd - J2000_JD) * SECONDS_PER_DAY
}

/// Convert seconds since J2000.0 (TDB) back to a Julian Date
///
/// Arguments
/// ---------
/// * `tdb_sec`: seconds since J2000.0 in the TDB time scale
///
/// Return
/// ------
/// * the corresponding Julian Date
pub fn tdb_seconds_to_jd(tdb_sec: Second) -> JulianDay {
    tdb_sec / SECONDS_PER_DAY + J2000_JD
}

/// Convert a Gregorian calendar date expressed in TDB to seconds since J2000.0
///
/// Accepted forms are `YYYY-MM-DD`, `YYYY-MM-DDThh:mm`, `YYYY-MM-DDThh:mm:ss` and
/// `YYYY-MM-DDThh:mm:ss.fff`; a space may replace the `T` separator and a trailing
/// `TDB` tag is tolerated.
///
/// Arguments
/// ---------
/// * `date_str`: calendar date string
///
/// Return
/// ------
/// * seconds since J2000.0 (TDB), or [`CatalogError::InvalidDate`] when the string is not a
///   valid calendar date
pub fn calendar_to_tdb_seconds(date_str: &str) -> Result<Second, CatalogError> {
    let invalid = || CatalogError::InvalidDate(date_str.to_string());

    let caps = CALENDAR_DATE.captures(date_str).ok_or_else(invalid)?;

    let field = |idx: usize| caps.get(idx).map(|m| m.as_str());
    let year = i32::from_str(field(1).ok_or_else(invalid)?).map_err(|_| invalid())?;
    let month = u8::from_str(field(2).ok_or_else(invalid)?).map_err(|_| invalid())?;
    let day = u8::from_str(field(3).ok_or_else(invalid)?).map_err(|_| invalid())?;
    let hour = field(4).map(u8::from_str).transpose().map_err(|_| invalid())?;
    let minute = field(5).map(u8::from_str).transpose().map_err(|_| invalid())?;
    let second = field(6).map(u8::from_str).transpose().map_err(|_| invalid())?;

    // fractional seconds are right-padded to nanoseconds: ".5" is 500_000_000 ns
    let nanos = match field(7) {
        Some(frac) => u32::from_str(&format!("{frac:0<9}")).map_err(|_| invalid())?,
        None => 0,
    };

    let (hour, minute, second) = (hour.unwrap_or(0), minute.unwrap_or(0), second.unwrap_or(0));
    if !(1..=12).contains(&month) || day == 0 || day > 31 || hour > 23 || minute > 59 || second > 60
    {
        return Err(invalid());
    }

    let epoch = Epoch::maybe_from_gregorian(
        year,
        month,
        day,
        hour,
        minute,
        second,
        nanos,
        TimeScale::TDB,
    )
    .map_err(|_| invalid())?;

    Ok(jd_to_tdb_seconds(epoch.to_jde_tdb_days()))
}

/// Convert a two-line-element epoch (two-digit year and fractional day of year, UTC) to
/// seconds since J2000.0 in TDB.
///
/// Arguments
/// ---------
/// * `two_digit_year`: year field of a TLE; 57–99 map to the 1900s, 00–56 to the 2000s
/// * `day_of_year`: fractional day of year, 1.0 being January 1st at 0h UTC
///
/// Return
/// ------
/// * seconds since J2000.0 (TDB)
pub fn tle_epoch_to_tdb_seconds(two_digit_year: u32, day_of_year: f64) -> Second {
    let year = if two_digit_year < 57 {
        2000 + two_digit_year as i32
    } else {
        1900 + two_digit_year as i32
    };
    let new_year = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
    let epoch = new_year + Unit::Day * (day_of_year - 1.0);
    jd_to_tdb_seconds(epoch.to_jde_tdb_days())
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_jd_round_trip() {
        assert_eq!(jd_to_tdb_seconds(J2000_JD), 0.0);
        assert_eq!(jd_to_tdb_seconds(J2000_JD + 1.0), SECONDS_PER_DAY);
        assert_relative_eq!(tdb_seconds_to_jd(jd_to_tdb_seconds(2455197.5)), 2455197.5);
    }

    #[test]
    fn test_calendar_date_matches_julian_day() {
        let noon = calendar_to_tdb_seconds("2000-01-01T12:00:00").unwrap();
        assert_relative_eq!(noon, 0.0, epsilon = 1e-3);

        let midnight = calendar_to_tdb_seconds("2010-01-01").unwrap();
        assert_relative_eq!(midnight, jd_to_tdb_seconds(2455197.5), epsilon = 1e-3);

        let with_fraction = calendar_to_tdb_seconds("2000-01-02 00:00:00.5").unwrap();
        assert_relative_eq!(with_fraction, 43200.5, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_calendar_dates() {
        assert_eq!(
            calendar_to_tdb_seconds("yesterday"),
            Err(CatalogError::InvalidDate("yesterday".into()))
        );
        assert!(calendar_to_tdb_seconds("2000-13-01").is_err());
        assert!(calendar_to_tdb_seconds("2000-01-01T25:00").is_err());
    }

    #[test]
    fn test_tle_epoch() {
        // 2000 day 1.5 is 2000-01-01 12:00 UTC, about 64.184 s before J2000 TDB
        let t = tle_epoch_to_tdb_seconds(0, 1.5);
        assert_relative_eq!(t, -64.184, epsilon = 1e-2);
    }
}
