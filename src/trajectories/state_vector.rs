//! Position/velocity pair returned by every trajectory.
//!
//! Units
//! -----------------
//! * `position`: kilometers (km)
//! * `velocity`: kilometers per second (km/s)
//!
//! States are always relative to the center of the arc that owns the trajectory and
//! expressed in that arc's trajectory frame. Addition and subtraction are component-wise,
//! which is what chaining states along a center hierarchy needs.

use nalgebra::Vector3;
use std::ops::{Add, Sub};

/// Cartesian state of a body relative to its arc center.
///
/// Fields
/// -----------------
/// * `position`: Cartesian position (km).
/// * `velocity`: Cartesian velocity (km/s). Position-only sources report a zero velocity
///   unless they can differentiate their samples.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    /// A state at rest at the given position.
    pub fn at_rest(position: Vector3<f64>) -> Self {
        StateVector {
            position,
            velocity: Vector3::zeros(),
        }
    }
}

impl Default for StateVector {
    fn default() -> Self {
        StateVector::at_rest(Vector3::zeros())
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: self.position + rhs.position,
            velocity: self.velocity + rhs.velocity,
        }
    }
}

impl Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: self.position - rhs.position,
            velocity: self.velocity - rhs.velocity,
        }
    }
}
