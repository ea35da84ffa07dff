use camino::Utf8Path;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::catalog_errors::CatalogError;
use crate::constants::{Second, EPS};
use crate::time::jd_to_tdb_seconds;
use crate::trajectories::sampled_file::read_numeric_records;

/// Axis conventions of orientation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationConvention {
    #[default]
    Standard,
    /// Tables written for Celestia, whose body axes differ from ours.
    Celestia,
}

impl RotationConvention {
    /// Convert a quaternion read from a table into the standard convention.
    pub fn convert(self, q: UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        match self {
            RotationConvention::Standard => q,
            RotationConvention::Celestia => {
                q.conjugate()
                    * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 90f64.to_radians())
                    * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 180f64.to_radians())
            }
        }
    }
}

/// Orientation interpolated (slerp) from a time-ordered table of quaternions.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedRotation {
    samples: Vec<(Second, UnitQuaternion<f64>)>,
}

impl InterpolatedRotation {
    pub fn new(samples: Vec<(Second, UnitQuaternion<f64>)>) -> Self {
        InterpolatedRotation { samples }
    }

    pub fn samples(&self) -> &[(Second, UnitQuaternion<f64>)] {
        &self.samples
    }

    pub fn orientation(&self, t: Second) -> UnitQuaternion<f64> {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return UnitQuaternion::identity(),
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        let idx = self.samples.partition_point(|(time, _)| *time <= t);
        let (t0, q0) = self.samples[idx - 1];
        let (t1, q1) = self.samples[idx];
        if t1 <= t0 {
            return q1;
        }
        let u = (t - t0) / (t1 - t0);
        // antipodal neighbours have no unique great arc; fall back to nlerp
        q0.try_slerp(&q1, u, EPS).unwrap_or_else(|| q0.nlerp(&q1, u))
    }
}

/// Parse the contents of a `.q` table (`jd w x y z` records).
///
/// Return
/// ----------
/// * the rotation, or [`CatalogError::SampledFile`] for a malformed record, a zero
///   quaternion or a record going back in time
pub fn parse_q(
    text: &str,
    file: &str,
    convention: RotationConvention,
) -> Result<InterpolatedRotation, CatalogError> {
    let records = read_numeric_records::<5>(text, file)?;

    let mut samples: Vec<(Second, UnitQuaternion<f64>)> = Vec::with_capacity(records.len());
    for (idx, [jd, w, x, y, z]) in records.into_iter().enumerate() {
        let fault = || CatalogError::SampledFile {
            file: file.to_string(),
            record: idx,
        };
        let q = Quaternion::new(w, x, y, z);
        if q.norm() < EPS {
            return Err(fault());
        }
        let time = jd_to_tdb_seconds(jd);
        if samples.last().is_some_and(|(prev, _)| time < *prev) {
            return Err(fault());
        }
        samples.push((time, convention.convert(UnitQuaternion::from_quaternion(q))));
    }

    Ok(InterpolatedRotation::new(samples))
}

/// Read a `.q` orientation file from disk.
pub fn load_interpolated_rotation(
    path: &Utf8Path,
    convention: RotationConvention,
) -> Result<InterpolatedRotation, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    parse_q(&text, path.as_str(), convention)
}
