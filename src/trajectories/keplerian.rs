use nalgebra::{Rotation3, Vector3};

use crate::catalog_errors::CatalogError;
use crate::constants::{Kilometer, Radian, Second, DPI, EPS};

use super::state_vector::StateVector;

/// Maximum Newton iterations when solving Kepler's equation
const MAX_KEPLER_ITERATIONS: usize = 50;

/// Convergence threshold on the eccentric anomaly correction
const KEPLER_TOLERANCE: f64 = 1e-14;

/// Returns the principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Two-body orbit described by classical elements.
///
/// Units:
/// * `periapsis_distance`: km
/// * `eccentricity`: unitless; < 1 elliptic, 1 parabolic, > 1 hyperbolic
/// * `inclination`, `ascending_node`, `argument_of_periapsis`, `mean_anomaly_at_epoch`: radians
/// * `epoch`: TDB seconds since J2000
/// * `mean_motion`: radians per second
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerianOrbit {
    pub periapsis_distance: Kilometer,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node: Radian,
    pub argument_of_periapsis: Radian,
    pub mean_anomaly_at_epoch: Radian,
    pub epoch: Second,
    pub mean_motion: f64,
}

impl KeplerianOrbit {
    /// Build an orbit from its semi-major axis and period.
    ///
    /// Arguments
    /// -----------------
    /// * `semi_major_axis`: size of the orbit (km), taken in absolute value for hyperbolas
    /// * `period`: orbital period (s); the mean motion is `2π / period`
    /// * remaining elements in radians, `epoch` in TDB seconds
    ///
    /// Return
    /// ----------
    /// * the orbit, or an error for a non-positive period or axis, a negative or
    ///   parabolic eccentricity (which has no finite semi-major axis)
    #[allow(clippy::too_many_arguments)]
    pub fn from_semi_major_axis(
        semi_major_axis: Kilometer,
        period: Second,
        eccentricity: f64,
        inclination: Radian,
        ascending_node: Radian,
        argument_of_periapsis: Radian,
        mean_anomaly: Radian,
        epoch: Second,
    ) -> Result<Self, CatalogError> {
        if !(period > 0.0) {
            return Err(CatalogError::InvalidValue(format!(
                "orbital period must be positive, got {period}"
            )));
        }
        if !(semi_major_axis > 0.0) {
            return Err(CatalogError::InvalidValue(format!(
                "semi-major axis must be positive, got {semi_major_axis}"
            )));
        }
        if !(eccentricity >= 0.0) || (eccentricity - 1.0).abs() < EPS {
            return Err(CatalogError::InvalidValue(format!(
                "eccentricity {eccentricity} has no finite semi-major axis"
            )));
        }

        Ok(KeplerianOrbit {
            periapsis_distance: semi_major_axis * (1.0 - eccentricity).abs(),
            eccentricity,
            inclination,
            ascending_node,
            argument_of_periapsis,
            mean_anomaly_at_epoch: mean_anomaly,
            epoch,
            mean_motion: DPI / period,
        })
    }

    /// Semi-major axis (km). Positive for every conic; infinite for a parabola.
    pub fn semi_major_axis(&self) -> Kilometer {
        self.periapsis_distance / (1.0 - self.eccentricity).abs()
    }

    /// Orbital period (s)
    pub fn period(&self) -> Second {
        DPI / self.mean_motion
    }

    pub fn mean_anomaly(&self, t: Second) -> Radian {
        self.mean_anomaly_at_epoch + self.mean_motion * (t - self.epoch)
    }

    /// Rotation from the perifocal frame to the frame of the elements: Rz(Ω)·Rx(i)·Rz(ω)
    fn orientation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.ascending_node)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.argument_of_periapsis)
    }

    /// Position and velocity at time `t` (TDB seconds since J2000).
    pub fn state(&self, t: Second) -> StateVector {
        let e = self.eccentricity;
        let m = self.mean_anomaly(t);

        let (position, velocity) = if e < 1.0 - EPS {
            let a = self.semi_major_axis();
            let ecc_anomaly = solve_kepler_elliptic(principal_angle(m), e);
            let (sin_e, cos_e) = ecc_anomaly.sin_cos();
            let b = a * (1.0 - e * e).sqrt();
            let e_dot = self.mean_motion / (1.0 - e * cos_e);
            (
                Vector3::new(a * (cos_e - e), b * sin_e, 0.0),
                Vector3::new(-a * sin_e * e_dot, b * cos_e * e_dot, 0.0),
            )
        } else if e > 1.0 + EPS {
            let a = self.semi_major_axis();
            let h = solve_kepler_hyperbolic(m, e);
            let (sinh_h, cosh_h) = (h.sinh(), h.cosh());
            let b = a * (e * e - 1.0).sqrt();
            let h_dot = self.mean_motion / (e * cosh_h - 1.0);
            (
                Vector3::new(a * (e - cosh_h), b * sinh_h, 0.0),
                Vector3::new(-a * sinh_h * h_dot, b * cosh_h * h_dot, 0.0),
            )
        } else {
            // Barker's equation: M = D + D³/3 with D = tan(ν/2)
            let q = self.periapsis_distance;
            let y = 1.5 * m;
            let w = (y + (y * y + 1.0).sqrt()).cbrt();
            let d = w - 1.0 / w;
            let d_dot = self.mean_motion / (1.0 + d * d);
            (
                Vector3::new(q * (1.0 - d * d), 2.0 * q * d, 0.0),
                Vector3::new(-2.0 * q * d * d_dot, 2.0 * q * d_dot, 0.0),
            )
        };

        let rot = self.orientation();
        StateVector::new(rot * position, rot * velocity)
    }
}

/// Solve `E - e sin E = M` for the eccentric anomaly with Newton's method.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: M in radians, ideally reduced to [0, 2π)
/// * `eccentricity`: e in [0, 1)
///
/// Return
/// ----------
/// * the eccentric anomaly E in radians
pub fn solve_kepler_elliptic(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    // starting at π converges for every e < 1
    let mut ecc_anomaly = if eccentricity > 0.8 {
        std::f64::consts::PI
    } else {
        mean_anomaly
    };

    for _ in 0..MAX_KEPLER_ITERATIONS {
        let delta = (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly)
            / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ecc_anomaly
}

/// Solve `e sinh H - H = M` for the hyperbolic anomaly with Newton's method.
pub fn solve_kepler_hyperbolic(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    let mut h = (mean_anomaly / eccentricity).asinh();

    for _ in 0..MAX_KEPLER_ITERATIONS {
        let delta =
            (eccentricity * h.sinh() - h - mean_anomaly) / (eccentricity * h.cosh() - 1.0);
        h -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    h
}
