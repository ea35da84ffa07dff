//! ASCII sample tables: `.xyzv` states, `.xyz` positions and `.q` orientations.
//!
//! All three formats are free-form whitespace-separated numbers with `#` comments running
//! to the end of the line. Records are read back to back, regardless of line breaks:
//!
//! | Format  | Record                          | Units                 |
//! |---------|---------------------------------|-----------------------|
//! | `.xyzv` | `jd x y z vx vy vz`             | TDB JD, km, km/s      |
//! | `.xyz`  | `jd x y z`                      | TDB JD, km            |
//! | `.q`    | `jd w x y z`                    | TDB JD, quaternion    |
//!
//! A token that is not a number, or a record cut short by the end of the file, fails the
//! whole file with [`CatalogError::SampledFile`] carrying the number of complete records
//! read before the fault.

use camino::Utf8Path;
use itertools::Itertools;
use nalgebra::Vector3;
use tracing::debug;

use crate::catalog_errors::CatalogError;
use crate::time::jd_to_tdb_seconds;

use super::interpolated::{InterpolatedStateTrajectory, TimeSample};

/// Read a table of fixed-width numeric records.
///
/// Arguments
/// -----------------
/// * `text`: file contents
/// * `file`: name reported in errors
///
/// Return
/// ----------
/// * one array per record, in file order
pub fn read_numeric_records<const N: usize>(
    text: &str,
    file: &str,
) -> Result<Vec<[f64; N]>, CatalogError> {
    let tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace);

    let mut records = Vec::new();
    for chunk in &tokens.chunks(N) {
        let fault = || CatalogError::SampledFile {
            file: file.to_string(),
            record: records.len(),
        };

        let mut record = [0.0; N];
        let mut filled = 0;
        for (slot, token) in record.iter_mut().zip(chunk) {
            *slot = token.parse::<f64>().map_err(|_| fault())?;
            filled += 1;
        }
        if filled < N {
            return Err(fault());
        }
        records.push(record);
    }
    Ok(records)
}

/// Parse the contents of an `.xyzv` file.
pub fn parse_xyzv(text: &str, file: &str) -> Result<InterpolatedStateTrajectory, CatalogError> {
    let samples = read_numeric_records::<7>(text, file)?
        .into_iter()
        .map(|[jd, x, y, z, vx, vy, vz]| TimeSample {
            time: jd_to_tdb_seconds(jd),
            position: Vector3::new(x, y, z),
            velocity: Some(Vector3::new(vx, vy, vz)),
        })
        .collect();
    InterpolatedStateTrajectory::new(samples, file)
}

/// Parse the contents of an `.xyz` file.
pub fn parse_xyz(text: &str, file: &str) -> Result<InterpolatedStateTrajectory, CatalogError> {
    let samples = read_numeric_records::<4>(text, file)?
        .into_iter()
        .map(|[jd, x, y, z]| TimeSample {
            time: jd_to_tdb_seconds(jd),
            position: Vector3::new(x, y, z),
            velocity: None,
        })
        .collect();
    InterpolatedStateTrajectory::new(samples, file)
}

/// Sampled trajectory formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampledFormat {
    States,
    Positions,
}

impl SampledFormat {
    /// `.xyzv` or `.xyz`, case-insensitively; any other extension is unknown.
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".xyzv") {
            Some(SampledFormat::States)
        } else if lower.ends_with(".xyz") {
            Some(SampledFormat::Positions)
        } else {
            None
        }
    }
}

/// Read a sampled trajectory file from disk.
pub fn load_sampled_trajectory(
    path: &Utf8Path,
    format: SampledFormat,
) -> Result<InterpolatedStateTrajectory, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    let trajectory = match format {
        SampledFormat::States => parse_xyzv(&text, path.as_str()),
        SampledFormat::Positions => parse_xyz(&text, path.as_str()),
    }?;
    debug!("Read {} samples from {path}", trajectory.samples().len());
    Ok(trajectory)
}
