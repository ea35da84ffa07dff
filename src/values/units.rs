//! Unit-suffixed scalar parsing.
//!
//! Catalog authors may write a distance or duration either as a bare number, interpreted in
//! a default unit chosen by the field, or as a string carrying a unit suffix such as
//! `"3.2au"`, `"6378.137 km"` or `"400ms"`. The value is converted to the canonical unit
//! (kilometers for distances, seconds for durations) in two steps: scale to the canonical
//! unit with a fixed per-unit multiplier, then divide by the multiplier of the requested
//! output unit.
//!
//! An unrecognized suffix is always a hard failure.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::catalog_errors::CatalogError;
use crate::constants::{AU, DAYS_PER_JULIAN_YEAR, SECONDS_PER_DAY};

static VALUE_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*([A-Za-z]+)?\s*$")
        .expect("value/unit pattern is valid")
});

/// Distance units accepted in catalog strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    AstronomicalUnit,
}

/// Time units accepted in catalog strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    JulianYear,
}

impl DistanceUnit {
    /// Multiplier converting one of this unit to kilometers
    pub fn to_km(self) -> f64 {
        match self {
            DistanceUnit::Millimeter => 1.0e-6,
            DistanceUnit::Centimeter => 1.0e-5,
            DistanceUnit::Meter => 1.0e-3,
            DistanceUnit::Kilometer => 1.0,
            DistanceUnit::AstronomicalUnit => AU,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Millimeter => "mm",
            DistanceUnit::Centimeter => "cm",
            DistanceUnit::Meter => "m",
            DistanceUnit::Kilometer => "km",
            DistanceUnit::AstronomicalUnit => "au",
        }
    }
}

impl TimeUnit {
    /// Multiplier converting one of this unit to seconds
    pub fn to_seconds(self) -> f64 {
        match self {
            TimeUnit::Millisecond => 0.001,
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3600.0,
            TimeUnit::Day => SECONDS_PER_DAY,
            TimeUnit::JulianYear => DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "ms",
            TimeUnit::Second => "s",
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::JulianYear => "y",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(DistanceUnit::Millimeter),
            "cm" => Ok(DistanceUnit::Centimeter),
            "m" => Ok(DistanceUnit::Meter),
            "km" => Ok(DistanceUnit::Kilometer),
            "au" => Ok(DistanceUnit::AstronomicalUnit),
            other => Err(CatalogError::UnknownDistanceUnit(other.to_string())),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => Ok(TimeUnit::Millisecond),
            "s" => Ok(TimeUnit::Second),
            "m" => Ok(TimeUnit::Minute),
            "h" => Ok(TimeUnit::Hour),
            "d" => Ok(TimeUnit::Day),
            "y" | "a" => Ok(TimeUnit::JulianYear),
            other => Err(CatalogError::UnknownTimeUnit(other.to_string())),
        }
    }
}

/// Split a `<number><optional unit>` string into its numeric value and unit suffix.
///
/// Arguments
/// ---------
/// * `text`: the raw field value
///
/// Return
/// ------
/// * the number and, when present, the unit suffix
pub fn split_value_unit(text: &str) -> Result<(f64, Option<&str>), CatalogError> {
    let caps = VALUE_WITH_UNIT
        .captures(text)
        .ok_or_else(|| CatalogError::InvalidValue(text.to_string()))?;

    let number = caps
        .get(1)
        .map(|m| m.as_str())
        .ok_or_else(|| CatalogError::InvalidValue(text.to_string()))?;
    let value = f64::from_str(number).map_err(|_| CatalogError::InvalidValue(text.to_string()))?;

    Ok((value, caps.get(2).map(|m| m.as_str())))
}

pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    value * from.to_km() / to.to_km()
}

pub fn convert_time(value: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    value * from.to_seconds() / to.to_seconds()
}

/// Parse a distance string, converting to kilometers.
///
/// Arguments
/// ---------
/// * `text`: a string such as `"1.5au"` or `"42"`
/// * `default_unit`: unit applied when the string carries no suffix
///
/// Return
/// ------
/// * the distance in kilometers, or an error for a malformed number or an unknown suffix
pub fn parse_distance(text: &str, default_unit: DistanceUnit) -> Result<f64, CatalogError> {
    let (value, suffix) = split_value_unit(text)?;
    let unit = match suffix {
        Some(s) => DistanceUnit::from_str(s)?,
        None => default_unit,
    };
    Ok(convert_distance(value, unit, DistanceUnit::Kilometer))
}

/// Parse a duration string, converting to seconds.
///
/// Arguments
/// ---------
/// * `text`: a string such as `"400ms"`, `"1.5d"` or `"27"`
/// * `default_unit`: unit applied when the string carries no suffix
///
/// Return
/// ------
/// * the duration in seconds, or an error for a malformed number or an unknown suffix
pub fn parse_duration(text: &str, default_unit: TimeUnit) -> Result<f64, CatalogError> {
    let (value, suffix) = split_value_unit(text)?;
    let unit = match suffix {
        Some(s) => TimeUnit::from_str(s)?,
        None => default_unit,
    };
    Ok(convert_time(value, unit, TimeUnit::Second))
}

#[cfg(test)]
mod units_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_suffixes() {
        assert_relative_eq!(
            parse_distance("1au", DistanceUnit::Kilometer).unwrap(),
            149_597_870.691
        );
        assert_relative_eq!(parse_distance("2500 m", DistanceUnit::Kilometer).unwrap(), 2.5);
        assert_relative_eq!(parse_distance("3e3mm", DistanceUnit::Kilometer).unwrap(), 3e-3);
        assert_relative_eq!(parse_distance("12", DistanceUnit::Meter).unwrap(), 0.012);
        assert_relative_eq!(parse_distance(" -.5km ", DistanceUnit::Meter).unwrap(), -0.5);
    }

    #[test]
    fn test_time_suffixes() {
        assert_relative_eq!(parse_duration("400ms", TimeUnit::Day).unwrap(), 0.4);
        assert_relative_eq!(parse_duration("2h", TimeUnit::Day).unwrap(), 7200.0);
        assert_relative_eq!(parse_duration("1a", TimeUnit::Day).unwrap(), 31_557_600.0);
        assert_relative_eq!(parse_duration("1.5", TimeUnit::Day).unwrap(), 129_600.0);
        assert_relative_eq!(parse_duration("3m", TimeUnit::Day).unwrap(), 180.0);
    }

    #[test]
    fn test_unknown_suffix_is_an_error() {
        assert_eq!(
            parse_distance("4 furlongs", DistanceUnit::Kilometer),
            Err(CatalogError::UnknownDistanceUnit("furlongs".into()))
        );
        assert_eq!(
            parse_duration("4 fortnights", TimeUnit::Day),
            Err(CatalogError::UnknownTimeUnit("fortnights".into()))
        );
        assert!(parse_distance("au", DistanceUnit::Kilometer).is_err());
    }

    #[test]
    fn test_distance_unit_round_trip() {
        for (text, unit) in [
            ("7.25au", DistanceUnit::AstronomicalUnit),
            ("0.5cm", DistanceUnit::Centimeter),
            ("120m", DistanceUnit::Meter),
            ("88mm", DistanceUnit::Millimeter),
        ] {
            let km = parse_distance(text, DistanceUnit::Kilometer).unwrap();
            let reexpressed = format!("{}km", km);
            assert_relative_eq!(
                parse_distance(&reexpressed, DistanceUnit::Kilometer).unwrap(),
                km,
                max_relative = 1e-14
            );
            let (value, _) = split_value_unit(text).unwrap();
            assert_relative_eq!(
                convert_distance(km, DistanceUnit::Kilometer, unit),
                value,
                max_relative = 1e-12
            );
        }
    }
}
