use nalgebra::Vector3;

use crate::catalog_errors::CatalogError;
use crate::constants::Second;

use super::state_vector::StateVector;

/// One sample of a tabulated trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSample {
    /// TDB seconds since J2000
    pub time: Second,
    /// km
    pub position: Vector3<f64>,
    /// km/s, when the table provides it
    pub velocity: Option<Vector3<f64>>,
}

/// Trajectory interpolated from a time-ordered table of samples.
///
/// Between two samples that both carry velocities the position is a cubic Hermite
/// polynomial. Otherwise it is linear and the velocity is the slope of the segment.
/// Outside the table the nearest end sample is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedStateTrajectory {
    samples: Vec<TimeSample>,
}

impl InterpolatedStateTrajectory {
    /// Build from samples in non-decreasing time order.
    ///
    /// Return
    /// ----------
    /// * the trajectory, or [`CatalogError::SampledFile`] naming the first sample that
    ///   goes back in time
    pub fn new(samples: Vec<TimeSample>, source: &str) -> Result<Self, CatalogError> {
        if let Some(idx) = samples.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(CatalogError::SampledFile {
                file: source.to_string(),
                record: idx + 1,
            });
        }
        Ok(InterpolatedStateTrajectory { samples })
    }

    pub fn samples(&self) -> &[TimeSample] {
        &self.samples
    }

    pub fn has_velocities(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(|s| s.velocity.is_some())
    }

    /// Time span covered by the table. Empty tables cover `(0, 0)`.
    pub fn valid_range(&self) -> (Second, Second) {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => (0.0, 0.0),
        }
    }

    fn sample_state(sample: &TimeSample) -> StateVector {
        StateVector::new(sample.position, sample.velocity.unwrap_or_else(Vector3::zeros))
    }

    pub fn state(&self, t: Second) -> StateVector {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return StateVector::default(),
        };
        if t <= first.time {
            return Self::sample_state(first);
        }
        if t >= last.time {
            return Self::sample_state(last);
        }

        // first sample strictly after t; 1 <= idx < len here
        let idx = self.samples.partition_point(|s| s.time <= t);
        let s0 = &self.samples[idx - 1];
        let s1 = &self.samples[idx];
        let h = s1.time - s0.time;
        if h <= 0.0 {
            return Self::sample_state(s1);
        }
        let u = (t - s0.time) / h;

        match (s0.velocity, s1.velocity) {
            (Some(v0), Some(v1)) => {
                let u2 = u * u;
                let u3 = u2 * u;
                let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
                let h10 = u3 - 2.0 * u2 + u;
                let h01 = -2.0 * u3 + 3.0 * u2;
                let h11 = u3 - u2;

                let position = s0.position * h00
                    + v0 * (h * h10)
                    + s1.position * h01
                    + v1 * (h * h11);

                // d/du of the basis, divided by h for d/dt
                let d00 = 6.0 * u2 - 6.0 * u;
                let d10 = 3.0 * u2 - 4.0 * u + 1.0;
                let d01 = -6.0 * u2 + 6.0 * u;
                let d11 = 3.0 * u2 - 2.0 * u;
                let velocity = (s0.position * d00 + s1.position * d01) / h + v0 * d10 + v1 * d11;

                StateVector::new(position, velocity)
            }
            _ => StateVector::new(
                s0.position.lerp(&s1.position, u),
                (s1.position - s0.position) / h,
            ),
        }
    }
}

#[cfg(test)]
mod interpolated_test {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(time: f64, x: f64, vx: Option<f64>) -> TimeSample {
        TimeSample {
            time,
            position: Vector3::new(x, 0.0, 0.0),
            velocity: vx.map(|v| Vector3::new(v, 0.0, 0.0)),
        }
    }

    #[test]
    fn test_linear_positions() {
        let traj = InterpolatedStateTrajectory::new(
            vec![sample(0.0, 0.0, None), sample(10.0, 100.0, None), sample(20.0, 100.0, None)],
            "t",
        )
        .unwrap();

        let s = traj.state(2.5);
        assert_relative_eq!(s.position.x, 25.0);
        assert_relative_eq!(s.velocity.x, 10.0);
        assert_relative_eq!(traj.state(15.0).velocity.x, 0.0);
        assert_relative_eq!(traj.state(-5.0).position.x, 0.0);
        assert_relative_eq!(traj.state(50.0).position.x, 100.0);
    }

    #[test]
    fn test_hermite_reproduces_cubic() {
        // x(t) = t³ sampled with exact derivatives
        let f = |t: f64| t * t * t;
        let df = |t: f64| 3.0 * t * t;
        let traj = InterpolatedStateTrajectory::new(
            vec![sample(1.0, f(1.0), Some(df(1.0))), sample(3.0, f(3.0), Some(df(3.0)))],
            "t",
        )
        .unwrap();
        assert!(traj.has_velocities());

        for t in [1.5, 2.0, 2.7] {
            let s = traj.state(t);
            assert_relative_eq!(s.position.x, f(t), epsilon = 1e-10);
            assert_relative_eq!(s.velocity.x, df(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rejects_unordered_samples() {
        let result = InterpolatedStateTrajectory::new(
            vec![sample(0.0, 0.0, None), sample(10.0, 1.0, None), sample(5.0, 2.0, None)],
            "t.xyz",
        );
        assert_eq!(
            result,
            Err(CatalogError::SampledFile {
                file: "t.xyz".into(),
                record: 2
            })
        );
    }
}
