//! Annotations a body can carry in addition to its geometry.

use crate::body::BodyRef;
use crate::values::Spectrum;

/// Opacity of frame axes when the catalog does not give one
pub const FRAME_AXES_OPACITY: f64 = 0.3;

#[derive(Debug, Clone)]
pub enum Visualizer {
    /// Axes of the body-fixed frame
    BodyAxes { size: f64 },
    /// Axes of the arc's trajectory frame
    FrameAxes { size: f64, opacity: f64 },
    /// Arrow pointing from the body toward `target`
    BodyDirection {
        size: f64,
        target: BodyRef,
        color: Spectrum,
    },
}

impl Visualizer {
    pub fn kind(&self) -> &'static str {
        match self {
            Visualizer::BodyAxes { .. } => "BodyAxes",
            Visualizer::FrameAxes { .. } => "FrameAxes",
            Visualizer::BodyDirection { .. } => "BodyDirection",
        }
    }

    pub fn size(&self) -> f64 {
        match self {
            Visualizer::BodyAxes { size }
            | Visualizer::FrameAxes { size, .. }
            | Visualizer::BodyDirection { size, .. } => *size,
        }
    }
}
