use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::body::BodyRef;
use crate::catalog_errors::CatalogError;
use crate::constants::EPS;

use super::FrameRef;

/// Signed coordinate axis of a two-vector frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    PositiveX,
    PositiveY,
    PositiveZ,
    NegativeX,
    NegativeY,
    NegativeZ,
}

impl Axis {
    /// Index of the coordinate line the axis lies on (0 = x, 1 = y, 2 = z).
    pub fn line(&self) -> usize {
        match self {
            Axis::PositiveX | Axis::NegativeX => 0,
            Axis::PositiveY | Axis::NegativeY => 1,
            Axis::PositiveZ | Axis::NegativeZ => 2,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Axis::NegativeX | Axis::NegativeY | Axis::NegativeZ)
    }

    pub fn unit_vector(&self) -> Vector3<f64> {
        let mut v = Vector3::zeros();
        v[self.line()] = if self.is_negative() { -1.0 } else { 1.0 };
        v
    }
}

impl FromStr for Axis {
    type Err = CatalogError;

    /// Accepts `x`, `+x`, `-x` and the same for y and z, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "+x" => Ok(Axis::PositiveX),
            "y" | "+y" => Ok(Axis::PositiveY),
            "z" | "+z" => Ok(Axis::PositiveZ),
            "-x" => Ok(Axis::NegativeX),
            "-y" => Ok(Axis::NegativeY),
            "-z" => Ok(Axis::NegativeZ),
            _ => Err(CatalogError::invalid(format!("Invalid axis label '{s}'"))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        let letter = ['x', 'y', 'z'][self.line()];
        write!(f, "{sign}{letter}")
    }
}

/// Direction used to fix one axis of a two-vector frame.
#[derive(Debug, Clone)]
pub enum Direction {
    /// From `observer` towards `target`
    RelativePosition { observer: BodyRef, target: BodyRef },
    /// Velocity of `target` relative to `observer`
    RelativeVelocity { observer: BodyRef, target: BodyRef },
    /// A fixed vector expressed in `frame`
    ConstantVector {
        direction: Vector3<f64>,
        frame: FrameRef,
    },
}

impl Direction {
    /// A constant direction; the zero vector defines no direction and is rejected.
    pub fn constant(direction: Vector3<f64>, frame: FrameRef) -> Result<Self, CatalogError> {
        if direction.norm() < EPS {
            return Err(CatalogError::invalid(
                "Zero vector given for ConstantVector direction",
            ));
        }
        Ok(Direction::ConstantVector { direction, frame })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Direction::RelativePosition { .. } => "RelativePosition",
            Direction::RelativeVelocity { .. } => "RelativeVelocity",
            Direction::ConstantVector { .. } => "ConstantVector",
        }
    }
}

/// Frame whose primary axis follows one direction and whose secondary axis is the part
/// of a second direction orthogonal to the first.
#[derive(Debug, Clone)]
pub struct TwoVectorFrame {
    primary: Direction,
    primary_axis: Axis,
    secondary: Direction,
    secondary_axis: Axis,
}

impl TwoVectorFrame {
    /// Build a two-vector frame.
    ///
    /// Return
    /// ----------
    /// * the frame, or an error when both axes lie on the same coordinate line (an axis
    ///   paired with itself or its negation)
    pub fn new(
        primary: Direction,
        primary_axis: Axis,
        secondary: Direction,
        secondary_axis: Axis,
    ) -> Result<Self, CatalogError> {
        if primary_axis.line() == secondary_axis.line() {
            return Err(CatalogError::invalid(format!(
                "Primary and secondary axes of TwoVector frame must be orthogonal ({primary_axis} and {secondary_axis} given)"
            )));
        }
        Ok(TwoVectorFrame {
            primary,
            primary_axis,
            secondary,
            secondary_axis,
        })
    }

    pub fn primary(&self) -> &Direction {
        &self.primary
    }

    pub fn primary_axis(&self) -> Axis {
        self.primary_axis
    }

    pub fn secondary(&self) -> &Direction {
        &self.secondary
    }

    pub fn secondary_axis(&self) -> Axis {
        self.secondary_axis
    }
}
