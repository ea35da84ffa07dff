//! Two-line element sets.
//!
//! A TLE is a pair of fixed-column ASCII lines published for Earth satellites:
//!
//! ```text
//! 1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//!
//! Only the mean elements are used. The trajectory is the two-body orbit they describe
//! around the Earth, in the TEME-like equatorial frame of the elements.
//!
//! Each line ends with a modulo-10 checksum: the sum of all digits of the first 68
//! columns, counting each minus sign as 1.

use std::str::FromStr;

use crate::catalog_errors::CatalogError;
use crate::constants::{Second, DPI, EARTH_GM, RADEG, SECONDS_PER_DAY};
use crate::time::tle_epoch_to_tdb_seconds;

use super::keplerian::KeplerianOrbit;
use super::state_vector::StateVector;

const TLE_LINE_LENGTH: usize = 69;

/// Mean elements decoded from a TLE, plus the raw lines they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TleTrajectory {
    name: String,
    line1: String,
    line2: String,
    satellite_number: u32,
    orbit: KeplerianOrbit,
}

/// Columns are 1-based and inclusive, as in the published format.
fn columns(line: &str, first: usize, last: usize) -> &str {
    line.get(first - 1..last).unwrap_or("").trim()
}

fn parse_column<T: FromStr>(
    line: &str,
    first: usize,
    last: usize,
    name: &str,
) -> Result<T, CatalogError> {
    columns(line, first, last)
        .parse::<T>()
        .map_err(|_| CatalogError::InvalidTle(name.to_string()))
}

/// Checksum of the first 68 columns of a TLE line.
pub fn tle_checksum(line: &str) -> u32 {
    line.chars()
        .take(TLE_LINE_LENGTH - 1)
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum::<u32>()
        % 10
}

fn validate_line(line: &str, number: char, name: &str) -> Result<(), CatalogError> {
    let invalid = || CatalogError::InvalidTle(name.to_string());

    if line.len() < TLE_LINE_LENGTH || !line.is_ascii() || !line.starts_with(number) {
        return Err(invalid());
    }
    let expected = line
        .chars()
        .nth(TLE_LINE_LENGTH - 1)
        .and_then(|c| c.to_digit(10))
        .ok_or_else(invalid)?;
    if tle_checksum(line) != expected {
        return Err(invalid());
    }
    Ok(())
}

impl TleTrajectory {
    /// Parse a TLE.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: satellite name, used in error messages
    /// * `line1`, `line2`: the two element lines; trailing whitespace is ignored
    ///
    /// Return
    /// ----------
    /// * the trajectory, or [`CatalogError::InvalidTle`] when a line is too short, starts
    ///   with the wrong line number, fails its checksum, the satellite numbers differ or a
    ///   field does not parse
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, CatalogError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        let invalid = || CatalogError::InvalidTle(name.to_string());

        validate_line(line1, '1', name)?;
        validate_line(line2, '2', name)?;

        let satellite_number: u32 = parse_column(line1, 3, 7, name)?;
        if parse_column::<u32>(line2, 3, 7, name)? != satellite_number {
            return Err(invalid());
        }

        let epoch_year: u32 = parse_column(line1, 19, 20, name)?;
        let epoch_day: f64 = parse_column(line1, 21, 32, name)?;

        let inclination: f64 = parse_column(line2, 9, 16, name)?;
        let ascending_node: f64 = parse_column(line2, 18, 25, name)?;
        // leading decimal point is implied
        let eccentricity: f64 = format!("0.{}", columns(line2, 27, 33))
            .parse()
            .map_err(|_| invalid())?;
        let argument_of_perigee: f64 = parse_column(line2, 35, 42, name)?;
        let mean_anomaly: f64 = parse_column(line2, 44, 51, name)?;
        let revs_per_day: f64 = parse_column(line2, 53, 63, name)?;

        if !(revs_per_day > 0.0) || eccentricity >= 1.0 {
            return Err(invalid());
        }

        let mean_motion = revs_per_day * DPI / SECONDS_PER_DAY;
        let semi_major_axis = (EARTH_GM / (mean_motion * mean_motion)).cbrt();

        let orbit = KeplerianOrbit {
            periapsis_distance: semi_major_axis * (1.0 - eccentricity),
            eccentricity,
            inclination: inclination * RADEG,
            ascending_node: ascending_node * RADEG,
            argument_of_periapsis: argument_of_perigee * RADEG,
            mean_anomaly_at_epoch: mean_anomaly * RADEG,
            epoch: tle_epoch_to_tdb_seconds(epoch_year, epoch_day),
            mean_motion,
        };

        Ok(TleTrajectory {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            satellite_number,
            orbit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn satellite_number(&self) -> u32 {
        self.satellite_number
    }

    /// Epoch of the elements (TDB seconds since J2000)
    pub fn epoch(&self) -> Second {
        self.orbit.epoch
    }

    pub fn orbit(&self) -> &KeplerianOrbit {
        &self.orbit
    }

    /// Replace the elements of this instance with those of `other`, keeping the instance.
    pub fn copy_from(&mut self, other: &TleTrajectory) {
        self.clone_from(other);
    }

    /// Earth-relative state at `t` (TDB seconds since J2000).
    pub fn state(&self, t: Second) -> StateVector {
        self.orbit.state(t)
    }
}

#[cfg(test)]
pub(crate) mod tle_test {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    pub(crate) const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_checksum() {
        assert_eq!(tle_checksum(ISS_LINE1), 7);
        assert_eq!(tle_checksum(ISS_LINE2), 7);
    }

    #[test]
    fn test_parse_iss() {
        let tle = TleTrajectory::parse("ISS", ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(tle.satellite_number(), 25544);

        let orbit = tle.orbit();
        assert_relative_eq!(orbit.eccentricity, 0.0006703);
        assert_relative_eq!(orbit.inclination, 51.6416 * RADEG);
        // about 6731 km for a 15.72 rev/day orbit
        assert_relative_eq!(orbit.semi_major_axis(), 6_731.0, epsilon = 1.0);

        let r = tle.state(tle.epoch()).position.norm();
        assert!(r > 6_720.0 && r < 6_740.0);
    }

    #[test]
    fn test_rejects_corrupted_lines() {
        let bad_checksum = ISS_LINE1.replace("2927", "2928");
        assert_eq!(
            TleTrajectory::parse("ISS", &bad_checksum, ISS_LINE2),
            Err(CatalogError::InvalidTle("ISS".into()))
        );
        assert!(TleTrajectory::parse("ISS", ISS_LINE2, ISS_LINE1).is_err());
        assert!(TleTrajectory::parse("ISS", &ISS_LINE1[..60], ISS_LINE2).is_err());
        assert!(TleTrajectory::parse("ISS", "", "").is_err());
    }

    #[test]
    fn test_copy_keeps_instance() {
        let mut tle = TleTrajectory::parse("ISS", ISS_LINE1, ISS_LINE2).unwrap();
        let mut other = tle.clone();
        other.name = "renamed".into();
        tle.copy_from(&other);
        assert_eq!(tle.name(), "renamed");
    }
}
