//! # Trajectories: motion models of catalog bodies
//!
//! Every arc of a body's chronology may carry a [`Trajectory`] giving the body's state
//! relative to the arc center, in the arc's trajectory frame.
//!
//! Modules
//! -----------------
//! * [`state_vector`] – position/velocity pair returned by every model.
//! * [`keplerian`] – two-body orbits from classical elements.
//! * [`chebyshev`] – piecewise Chebyshev series, as decoded from planetary ephemerides.
//! * [`interpolated`] – tabulated states with linear or Hermite interpolation.
//! * [`sampled_file`] – readers for `.xyzv`, `.xyz` (and the numeric table used by `.q`).
//! * [`tle`] – two-line element sets, updatable in place.
//!
//! Sharing
//! -----------------
//! * Tabulated and decoded trajectories are immutable and shared through `Rc`.
//! * TLE trajectories are `Rc<RefCell<_>>` handles owned by their arcs. The loader keeps
//!   a `Weak` to each so that fresh element sets can be copied into the very instance the
//!   arcs reference.
//! * [`Trajectory::Builtin`] wraps an entry of the loader's builtin table together with
//!   the name it was requested under.

pub mod chebyshev;
pub mod interpolated;
pub mod keplerian;
pub mod sampled_file;
pub mod state_vector;
pub mod tle;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nalgebra::Vector3;

use crate::constants::{Kilometer, Radian, Second};

use chebyshev::ChebyshevPolyTrajectory;
use interpolated::InterpolatedStateTrajectory;
use keplerian::KeplerianOrbit;
use state_vector::StateVector;
use tle::TleTrajectory;

/// Shared handle on a live-updatable TLE trajectory.
pub type TleHandle = Rc<RefCell<TleTrajectory>>;

/// Registry side of a [`TleHandle`]; dies with the last arc holding the trajectory.
pub type WeakTleHandle = Weak<RefCell<TleTrajectory>>;

#[derive(Debug, Clone)]
pub enum Trajectory {
    /// Constant position (km)
    FixedPoint(Vector3<f64>),
    /// Constant position given in spherical coordinates
    FixedSpherical {
        latitude: Radian,
        longitude: Radian,
        radius: Kilometer,
    },
    Keplerian(KeplerianOrbit),
    Builtin {
        name: String,
        trajectory: Rc<Trajectory>,
    },
    InterpolatedStates(Rc<InterpolatedStateTrajectory>),
    Tle(TleHandle),
    ChebyshevPoly(Rc<ChebyshevPolyTrajectory>),
}

impl Trajectory {
    /// Position of a [`Trajectory::FixedSpherical`]: `r·(cosφ cosλ, cosφ sinλ, sinφ)`.
    pub fn spherical_position(latitude: Radian, longitude: Radian, radius: Kilometer) -> Vector3<f64> {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat) * radius
    }

    /// State at `t` (TDB seconds since J2000), relative to the arc center.
    pub fn state(&self, t: Second) -> StateVector {
        match self {
            Trajectory::FixedPoint(position) => StateVector::at_rest(*position),
            Trajectory::FixedSpherical {
                latitude,
                longitude,
                radius,
            } => StateVector::at_rest(Self::spherical_position(*latitude, *longitude, *radius)),
            Trajectory::Keplerian(orbit) => orbit.state(t),
            Trajectory::Builtin { trajectory, .. } => trajectory.state(t),
            Trajectory::InterpolatedStates(table) => table.state(t),
            Trajectory::Tle(tle) => tle.borrow().state(t),
            Trajectory::ChebyshevPoly(cheb) => cheb.state(t),
        }
    }

    /// Short name of the variant, as written in catalog `type` fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Trajectory::FixedPoint(_) => "FixedPoint",
            Trajectory::FixedSpherical { .. } => "FixedSpherical",
            Trajectory::Keplerian(_) => "Keplerian",
            Trajectory::Builtin { .. } => "Builtin",
            Trajectory::InterpolatedStates(_) => "InterpolatedStates",
            Trajectory::Tle(_) => "TLE",
            Trajectory::ChebyshevPoly(_) => "ChebyshevPoly",
        }
    }
}

impl From<ChebyshevPolyTrajectory> for Trajectory {
    fn from(cheb: ChebyshevPolyTrajectory) -> Self {
        Trajectory::ChebyshevPoly(Rc::new(cheb))
    }
}

#[cfg(test)]
mod trajectory_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_trajectories() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Trajectory::FixedPoint(p).state(1e9), StateVector::at_rest(p));

        let sph = Trajectory::FixedSpherical {
            latitude: 90.0 * RADEG,
            longitude: 0.0,
            radius: 10.0,
        };
        assert_relative_eq!(
            sph.state(0.0).position,
            Vector3::new(0.0, 0.0, 10.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_builtin_delegates() {
        let inner = Rc::new(Trajectory::FixedPoint(Vector3::x()));
        let builtin = Trajectory::Builtin {
            name: "Origin".into(),
            trajectory: Rc::clone(&inner),
        };
        assert_eq!(builtin.state(0.0).position, Vector3::x());
        assert_eq!(builtin.kind(), "Builtin");
    }
}
