//! # Reference frames
//!
//! Arcs place a trajectory in a *trajectory frame* and a rotation model in a *body frame*.
//! Three kinds of frame exist:
//!
//! - [`InertialFrame`] – fixed orientation relative to EME2000, known by name.
//! - `BodyFixed` – rotates with a registered body.
//! - [`TwoVectorFrame`] – built from two directions between bodies or constant vectors.
//!
//! Frames are shared through [`FrameRef`] (`Rc<Frame>`), since one frame object is often
//! referenced by several arcs and constant-vector directions.

pub mod inertial;
pub mod two_vector;

use std::rc::Rc;

use nalgebra::UnitQuaternion;

use crate::body::BodyRef;

pub use inertial::InertialFrame;
pub use two_vector::{Axis, Direction, TwoVectorFrame};

#[derive(Debug, Clone)]
pub enum Frame {
    Inertial(InertialFrame),
    BodyFixed(BodyRef),
    TwoVector(TwoVectorFrame),
}

pub type FrameRef = Rc<Frame>;

impl Frame {
    /// The frame used when an arc does not name one.
    pub fn default_frame() -> FrameRef {
        Rc::new(Frame::Inertial(InertialFrame::EquatorJ2000))
    }

    /// Orientation relative to EME2000 for inertial frames; `None` for frames whose
    /// orientation depends on the state of other bodies.
    pub fn inertial_orientation(&self) -> Option<UnitQuaternion<f64>> {
        match self {
            Frame::Inertial(inertial) => Some(inertial.orientation()),
            Frame::BodyFixed(_) | Frame::TwoVector(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Inertial(_) => "Inertial",
            Frame::BodyFixed(_) => "BodyFixed",
            Frame::TwoVector(_) => "TwoVector",
        }
    }
}
