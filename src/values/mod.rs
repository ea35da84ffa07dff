//! # Catalog value parsing
//!
//! Catalog documents are weakly typed: a radius may be `6378`, `"6378 km"` or
//! `"0.0000426au"`, a date may be a Julian Day number or an ISO-8601 string, and a color
//! may be an RGB triple or `"#ffa040"`. This module turns those raw JSON values into
//! canonical quantities.
//!
//! ## Overview
//!
//! | Kind        | Accepted input                          | Canonical output                |
//! |-------------|-----------------------------------------|---------------------------------|
//! | distance    | number, `"<n><mm\|cm\|m\|km\|au>"`      | kilometers                      |
//! | duration    | number, `"<n><ms\|s\|m\|h\|d\|y\|a>"`   | seconds                         |
//! | angle       | number (degrees)                        | radians                         |
//! | vector      | `[x, y, z]`                             | [`Vector3<f64>`]                |
//! | quaternion  | `[w, x, y, z]`                          | normalized [`UnitQuaternion`]   |
//! | color       | `[r, g, b]`, name, `#rgb`, `#rrggbb`    | [`Spectrum`]                    |
//! | date        | Julian Day number, ISO-8601 TDB string  | TDB seconds since J2000.0       |
//!
//! Every parser reports failure explicitly through [`CatalogError`]. The `*_value`
//! variants taking an `Option<&Value>` return the supplied default when the field is
//! absent, but still fail when the field is present and malformed.
//!
//! ## See also
//!
//! - [`units`] – distance and time unit tables.
//! - [`color`] – color names and hexadecimal parsing.
//! - [`crate::time`] – calendar conversions backed by hifitime.

pub mod color;
pub mod units;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde_json::Value;

use crate::catalog_errors::CatalogError;
use crate::constants::{Kilometer, Radian, Second, EPS, RADEG};
use crate::time::{calendar_to_tdb_seconds, jd_to_tdb_seconds};

pub use color::Spectrum;
pub use units::{DistanceUnit, TimeUnit};

/// A catalog object: the JSON map describing an item, a trajectory, a frame, …
pub type FieldMap = serde_json::Map<String, Value>;

/// Read a JSON value as a number. Numeric strings are accepted as well.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read an optional numeric field, returning `default` when it is absent.
pub fn double_value(value: Option<&Value>, default: f64) -> Result<f64, CatalogError> {
    value.map_or(Ok(default), |v| {
        number(v).ok_or_else(|| CatalogError::InvalidValue(v.to_string()))
    })
}

/// Read a string field of a catalog object.
pub fn str_field<'a>(map: &'a FieldMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Read a boolean field of a catalog object.
pub fn bool_field(map: &FieldMap, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// Parse a distance, converting to kilometers.
///
/// Arguments
/// ---------
/// * `value`: a number (expressed in `default_unit`) or a unit-suffixed string
/// * `default_unit`: unit assumed for bare numbers and suffix-less strings
///
/// Return
/// ------
/// * the distance in kilometers
pub fn distance(value: &Value, default_unit: DistanceUnit) -> Result<Kilometer, CatalogError> {
    match value {
        Value::String(s) => units::parse_distance(s, default_unit),
        Value::Number(n) => n
            .as_f64()
            .map(|v| units::convert_distance(v, default_unit, DistanceUnit::Kilometer))
            .ok_or_else(|| CatalogError::InvalidValue(value.to_string())),
        other => Err(CatalogError::InvalidValue(other.to_string())),
    }
}

/// Parse an optional distance field, returning `default` (already in km) when absent.
pub fn distance_value(
    value: Option<&Value>,
    default_unit: DistanceUnit,
    default: Kilometer,
) -> Result<Kilometer, CatalogError> {
    value.map_or(Ok(default), |v| distance(v, default_unit))
}

/// Parse a duration, converting to seconds.
///
/// Arguments
/// ---------
/// * `value`: a number (expressed in `default_unit`) or a unit-suffixed string
/// * `default_unit`: unit assumed for bare numbers and suffix-less strings
///
/// Return
/// ------
/// * the duration in seconds
pub fn duration(value: &Value, default_unit: TimeUnit) -> Result<Second, CatalogError> {
    match value {
        Value::String(s) => units::parse_duration(s, default_unit),
        Value::Number(n) => n
            .as_f64()
            .map(|v| units::convert_time(v, default_unit, TimeUnit::Second))
            .ok_or_else(|| CatalogError::InvalidValue(value.to_string())),
        other => Err(CatalogError::InvalidValue(other.to_string())),
    }
}

/// Parse an optional duration field, returning `default` (already in seconds) when absent.
pub fn duration_value(
    value: Option<&Value>,
    default_unit: TimeUnit,
    default: Second,
) -> Result<Second, CatalogError> {
    value.map_or(Ok(default), |v| duration(v, default_unit))
}

/// Parse an angle given in degrees and return it in radians.
pub fn angle(value: &Value) -> Result<Radian, CatalogError> {
    number(value)
        .map(|deg| deg * RADEG)
        .ok_or_else(|| CatalogError::InvalidValue(value.to_string()))
}

/// Parse an optional angle field, returning `default` (already in radians) when absent.
pub fn angle_value(value: Option<&Value>, default: Radian) -> Result<Radian, CatalogError> {
    value.map_or(Ok(default), angle)
}

fn fixed_numeric_array<const N: usize>(value: &Value) -> Result<[f64; N], CatalogError> {
    let invalid = || CatalogError::InvalidValue(value.to_string());
    let list = value.as_array().ok_or_else(invalid)?;
    if list.len() != N {
        return Err(invalid());
    }

    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(list) {
        *slot = number(item).ok_or_else(invalid)?;
    }
    Ok(out)
}

/// Parse a `[x, y, z]` array.
pub fn vec3_value(value: &Value) -> Result<Vector3<f64>, CatalogError> {
    let [x, y, z] = fixed_numeric_array::<3>(value)?;
    Ok(Vector3::new(x, y, z))
}

/// Parse a `[w, x, y, z]` array into a normalized quaternion.
///
/// A quaternion of zero norm cannot be normalized and is rejected.
pub fn quaternion_value(value: &Value) -> Result<UnitQuaternion<f64>, CatalogError> {
    let [w, x, y, z] = fixed_numeric_array::<4>(value)?;
    let q = Quaternion::new(w, x, y, z);
    if q.norm() < EPS {
        return Err(CatalogError::InvalidValue(value.to_string()));
    }
    Ok(UnitQuaternion::from_quaternion(q))
}

/// Parse an optional color field, returning `default` when absent.
pub fn color_value(value: Option<&Value>, default: Spectrum) -> Result<Spectrum, CatalogError> {
    value.map_or(Ok(default), color::parse_color)
}

/// Parse a date: a TDB Julian Day number or an ISO-8601 calendar string in TDB.
///
/// Return
/// ------
/// * TDB seconds since J2000.0
pub fn date_value(value: &Value) -> Result<Second, CatalogError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(jd_to_tdb_seconds)
            .ok_or_else(|| CatalogError::InvalidDate(value.to_string())),
        Value::String(s) => calendar_to_tdb_seconds(s),
        other => Err(CatalogError::InvalidDate(other.to_string())),
    }
}
