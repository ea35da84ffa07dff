//! # Rotation models
//!
//! A [`RotationModel`] gives the orientation of a body frame relative to the arc's body
//! frame at a time `t`. Orientations are unit quaternions mapping body coordinates into
//! the reference frame.
//!
//! The pole of a uniformly rotating body is placed with two angles, the inclination and
//! the ascending node of its equator; the prime meridian then turns about the pole:
//!
//! ```text
//! q(t) = Rz(node) · Rx(inclination) · Rz(meridian + rate · (t - epoch))
//! ```

pub mod interpolated;

use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::{Radian, Second, DPI};

use interpolated::InterpolatedRotation;

/// Pole orientation plus spin about the pole.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformRotation {
    pub inclination: Radian,
    pub ascending_node: Radian,
    /// Meridian angle at `epoch`
    pub meridian_angle: Radian,
    /// Radians per second
    pub rate: f64,
    /// TDB seconds since J2000
    pub epoch: Second,
}

impl UniformRotation {
    /// Build from a rotation period in seconds. The rate is `2π / period`.
    pub fn from_period(
        inclination: Radian,
        ascending_node: Radian,
        meridian_angle: Radian,
        period: Second,
        epoch: Second,
    ) -> Self {
        UniformRotation {
            inclination,
            ascending_node,
            meridian_angle,
            rate: DPI / period,
            epoch,
        }
    }

    pub fn period(&self) -> Second {
        DPI / self.rate
    }

    pub fn orientation(&self, t: Second) -> UnitQuaternion<f64> {
        pole_orientation(
            self.inclination,
            self.ascending_node,
            self.meridian_angle + self.rate * (t - self.epoch),
        )
    }
}

/// `Rz(node) · Rx(inclination) · Rz(meridian)`
pub fn pole_orientation(
    inclination: Radian,
    ascending_node: Radian,
    meridian_angle: Radian,
) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), ascending_node)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), inclination)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), meridian_angle)
}

#[derive(Debug, Clone)]
pub enum RotationModel {
    Fixed(UnitQuaternion<f64>),
    Uniform(UniformRotation),
    Builtin {
        name: String,
        model: Rc<RotationModel>,
    },
    Interpolated(Rc<InterpolatedRotation>),
}

impl RotationModel {
    pub fn orientation(&self, t: Second) -> UnitQuaternion<f64> {
        match self {
            RotationModel::Fixed(q) => *q,
            RotationModel::Uniform(uniform) => uniform.orientation(t),
            RotationModel::Builtin { model, .. } => model.orientation(t),
            RotationModel::Interpolated(table) => table.orientation(t),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RotationModel::Fixed(_) => "Fixed",
            RotationModel::Uniform(_) => "Uniform",
            RotationModel::Builtin { .. } => "Builtin",
            RotationModel::Interpolated(_) => "Interpolated",
        }
    }
}
