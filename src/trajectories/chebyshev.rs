use nalgebra::Vector3;

use crate::catalog_errors::CatalogError;
use crate::constants::Second;

use super::state_vector::StateVector;

/// Piecewise Chebyshev trajectory, the form in which planetary ephemerides are stored.
///
/// The time line starting at `start_time` is cut into `granule_count` consecutive granules
/// of `granule_duration` seconds. Each granule owns `3 * (degree + 1)` coefficients laid
/// out as `[x0..xn, y0..yn, z0..zn]`, giving the position in kilometers as a Chebyshev
/// series of the granule-normalized time τ ∈ [-1, 1].
///
/// Notes
/// --------
/// * Times before the first granule evaluate the first granule, times past the last one
///   evaluate the last granule; callers are expected to stay within [`Self::valid_range`].
/// * Velocities come from the derivative series, scaled from d/dτ to d/dt.
///
/// See also
/// --------
/// * [`crate::jpl_ephem::JplEphemeris`] – the decoder producing these trajectories.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevPolyTrajectory {
    coeffs: Vec<f64>,
    degree: usize,
    granule_count: usize,
    start_time: Second,
    granule_duration: Second,
}

impl ChebyshevPolyTrajectory {
    /// Build a trajectory from a flat coefficient buffer.
    ///
    /// Arguments
    /// -----------------
    /// * `coeffs`: `granule_count * 3 * (degree + 1)` coefficients, granule after granule
    /// * `degree`: polynomial degree of each series
    /// * `granule_count`: number of granules covered by the buffer
    /// * `start_time`: start of the first granule, TDB seconds since J2000
    /// * `granule_duration`: length of one granule in seconds
    ///
    /// Return
    /// ----------
    /// * the trajectory, or an error when the buffer size does not match the layout or the
    ///   granule duration is not positive
    pub fn new(
        coeffs: Vec<f64>,
        degree: usize,
        granule_count: usize,
        start_time: Second,
        granule_duration: Second,
    ) -> Result<Self, CatalogError> {
        let expected = granule_count * 3 * (degree + 1);
        if coeffs.len() != expected {
            return Err(CatalogError::InvalidValue(format!(
                "Chebyshev buffer holds {} coefficients, {} expected",
                coeffs.len(),
                expected
            )));
        }
        if !(granule_duration > 0.0) {
            return Err(CatalogError::InvalidValue(format!(
                "Chebyshev granule duration must be positive, got {granule_duration}"
            )));
        }

        Ok(ChebyshevPolyTrajectory {
            coeffs,
            degree,
            granule_count,
            start_time,
            granule_duration,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn granule_count(&self) -> usize {
        self.granule_count
    }

    pub fn start_time(&self) -> Second {
        self.start_time
    }

    pub fn granule_duration(&self) -> Second {
        self.granule_duration
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Time span covered by the coefficients: `[start, start + count * duration]`.
    pub fn valid_range(&self) -> (Second, Second) {
        (
            self.start_time,
            self.start_time + self.granule_count as f64 * self.granule_duration,
        )
    }

    /// Evaluate position and velocity at `t` (TDB seconds since J2000).
    pub fn state(&self, t: Second) -> StateVector {
        if self.granule_count == 0 {
            return StateVector::default();
        }

        let elapsed = (t - self.start_time) / self.granule_duration;
        let granule = (elapsed.floor().max(0.0) as usize).min(self.granule_count - 1);
        let granule_start = self.start_time + granule as f64 * self.granule_duration;
        let tau = 2.0 * (t - granule_start) / self.granule_duration - 1.0;

        let n_coeff = self.degree + 1;

        // T_k(τ) by recurrence, and its derivative T'_k(τ)
        let mut tcheb = vec![0.0; n_coeff];
        let mut tcheb_deriv = vec![0.0; n_coeff];
        tcheb[0] = 1.0;
        if n_coeff > 1 {
            tcheb[1] = tau;
            tcheb_deriv[1] = 1.0;
        }
        for k in 2..n_coeff {
            tcheb[k] = 2.0 * tau * tcheb[k - 1] - tcheb[k - 2];
            tcheb_deriv[k] = 2.0 * tcheb[k - 1] + 2.0 * tau * tcheb_deriv[k - 1]
                - tcheb_deriv[k - 2];
        }

        let base = granule * 3 * n_coeff;
        let series = |axis: usize, basis: &[f64]| -> f64 {
            let start = base + axis * n_coeff;
            self.coeffs[start..start + n_coeff]
                .iter()
                .zip(basis)
                .map(|(c, b)| c * b)
                .sum()
        };

        let dtau_dt = 2.0 / self.granule_duration;
        StateVector::new(
            Vector3::new(series(0, &tcheb), series(1, &tcheb), series(2, &tcheb)),
            Vector3::new(
                series(0, &tcheb_deriv),
                series(1, &tcheb_deriv),
                series(2, &tcheb_deriv),
            ) * dtau_dt,
        )
    }
}

#[cfg(test)]
mod chebyshev_test {
    use super::*;
    use approx::assert_relative_eq;

    /// Two granules of degree 2, each 100 s long:
    /// granule 0: x = 1 + 2τ, y = 3, z = T2(τ) = 2τ² - 1
    /// granule 1: x = -τ, y = 0, z = 5
    fn sample() -> ChebyshevPolyTrajectory {
        let coeffs = vec![
            1.0, 2.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
            0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0,
        ];
        ChebyshevPolyTrajectory::new(coeffs, 2, 2, 1000.0, 100.0).unwrap()
    }

    #[test]
    fn test_layout_validation() {
        assert!(ChebyshevPolyTrajectory::new(vec![0.0; 8], 2, 1, 0.0, 10.0).is_err());
        assert!(ChebyshevPolyTrajectory::new(vec![0.0; 9], 2, 1, 0.0, 0.0).is_err());
        assert_eq!(sample().valid_range(), (1000.0, 1200.0));
    }

    #[test]
    fn test_evaluation_within_granules() {
        let cheb = sample();

        // middle of granule 0: τ = 0
        let s = cheb.state(1050.0);
        assert_relative_eq!(s.position, Vector3::new(1.0, 3.0, -1.0), epsilon = 1e-12);
        // dx/dt = 2 * dτ/dt = 2 * 2/100
        assert_relative_eq!(s.velocity, Vector3::new(0.04, 0.0, 0.0), epsilon = 1e-12);

        // τ = 0.5 in granule 0: z = 2*0.25 - 1, dz/dτ = 4τ = 2
        let s = cheb.state(1075.0);
        assert_relative_eq!(s.position.z, -0.5, epsilon = 1e-12);
        assert_relative_eq!(s.velocity.z, 2.0 * 0.02, epsilon = 1e-12);

        // start of granule 1: τ = -1
        let s = cheb.state(1100.0);
        assert_relative_eq!(s.position, Vector3::new(1.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_clamps_to_edge_granules() {
        let cheb = sample();
        assert_relative_eq!(cheb.state(900.0).position.y, 3.0);
        assert_relative_eq!(cheb.state(5000.0).position.z, 5.0);
    }
}
