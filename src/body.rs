//! Bodies, their chronologies and non-owning body references.
//!
//! The catalog owns every [`Body`] through a [`BodyHandle`] (`Rc<RefCell<Body>>`). Other
//! objects refer to bodies through a [`BodyRef`]: a weak handle that remembers the name
//! it was resolved from. A redefinition mutates the registered body in place, so every
//! `BodyRef` keeps pointing at the live definition.
//!
//! A chronology is a sequence of arcs laid end to end from its beginning time. Arc `i`
//! covers `[start_i, start_i + duration_i)` with `start_0 = beginning` and
//! `start_{i+1} = start_i + duration_i`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::{Second, DEFAULT_START_TIME};
use crate::frames::FrameRef;
use crate::geometry::Geometry;
use crate::rotation_models::RotationModel;
use crate::trajectories::state_vector::StateVector;
use crate::trajectories::Trajectory;
use crate::visualizers::Visualizer;

/// Deepest center chain followed when composing positions
const MAX_CENTER_CHAIN: usize = 64;

pub type BodyHandle = Rc<RefCell<Body>>;

/// Non-owning reference to a registered body.
#[derive(Clone)]
pub struct BodyRef {
    name: String,
    body: Weak<RefCell<Body>>,
}

impl BodyRef {
    pub fn new(name: &str, handle: &BodyHandle) -> Self {
        BodyRef {
            name: name.to_string(),
            body: Rc::downgrade(handle),
        }
    }

    /// Name under which the body was resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body, unless it has been dropped from the catalog since.
    pub fn upgrade(&self) -> Option<BodyHandle> {
        self.body.upgrade()
    }

    pub fn refers_to(&self, handle: &BodyHandle) -> bool {
        std::ptr::eq(self.body.as_ptr(), Rc::as_ptr(handle))
    }
}

impl fmt::Debug for BodyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyRef")
            .field("name", &self.name)
            .field("alive", &(self.body.strong_count() > 0))
            .finish()
    }
}

/// One time segment of a chronology.
#[derive(Debug, Clone)]
pub struct Arc {
    pub center: BodyRef,
    pub trajectory: Option<Trajectory>,
    pub rotation_model: Option<RotationModel>,
    pub trajectory_frame: FrameRef,
    pub body_frame: FrameRef,
    /// Seconds, always positive
    pub duration: Second,
}

#[derive(Debug, Clone)]
pub struct Chronology {
    beginning: Second,
    arcs: Vec<Arc>,
}

impl Default for Chronology {
    fn default() -> Self {
        Chronology {
            beginning: DEFAULT_START_TIME,
            arcs: Vec::new(),
        }
    }
}

impl Chronology {
    pub fn beginning(&self) -> Second {
        self.beginning
    }

    pub fn set_beginning(&mut self, beginning: Second) {
        self.beginning = beginning;
    }

    /// End of the last arc, or the beginning for an empty chronology.
    pub fn ending(&self) -> Second {
        self.beginning + self.arcs.iter().map(|arc| arc.duration).sum::<f64>()
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn add_arc(&mut self, arc: Arc) {
        self.arcs.push(arc);
    }

    pub fn clear_arcs(&mut self) {
        self.arcs.clear();
    }

    /// Start time of every arc, in order.
    pub fn arc_starts(&self) -> Vec<Second> {
        self.arcs
            .iter()
            .scan(self.beginning, |start, arc| {
                let this = *start;
                *start += arc.duration;
                Some(this)
            })
            .collect()
    }

    /// The arc covering `t`, if any.
    pub fn active_arc(&self, t: Second) -> Option<&Arc> {
        if t < self.beginning {
            return None;
        }
        let mut start = self.beginning;
        for arc in &self.arcs {
            if t < start + arc.duration {
                return Some(arc);
            }
            start += arc.duration;
        }
        None
    }
}

#[derive(Debug)]
pub struct Body {
    name: String,
    chronology: Chronology,
    geometry: Option<Geometry>,
    visualizers: AHashMap<String, Visualizer>,
    visible: bool,
}

impl Body {
    pub fn new(name: &str) -> Self {
        Body {
            name: name.to_string(),
            chronology: Chronology::default(),
            geometry: None,
            visualizers: AHashMap::new(),
            visible: true,
        }
    }

    pub fn into_handle(self) -> BodyHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn chronology_mut(&mut self) -> &mut Chronology {
        &mut self.chronology
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: Option<Geometry>) {
        self.geometry = geometry;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn visualizer(&self, tag: &str) -> Option<&Visualizer> {
        self.visualizers.get(tag)
    }

    pub fn visualizers(&self) -> impl Iterator<Item = (&str, &Visualizer)> {
        self.visualizers.iter().map(|(tag, vis)| (tag.as_str(), vis))
    }

    /// Attach a visualizer, replacing any previous one with the same tag.
    pub fn set_visualizer(&mut self, tag: &str, visualizer: Visualizer) {
        self.visualizers.insert(tag.to_string(), visualizer);
    }

    pub fn remove_visualizer(&mut self, tag: &str) -> Option<Visualizer> {
        self.visualizers.remove(tag)
    }

    /// Prepare for a redefinition: no geometry, visible, no arcs. Visualizers survive.
    pub fn reset(&mut self) {
        self.geometry = None;
        self.visible = true;
        self.chronology.clear_arcs();
    }

    /// State relative to the center of the arc active at `t`, in that arc's trajectory
    /// frame. Bodies without a trajectory sit at their center.
    pub fn relative_state(&self, t: Second) -> Option<StateVector> {
        let arc = self.chronology.active_arc(t)?;
        Some(
            arc.trajectory
                .as_ref()
                .map_or_else(StateVector::default, |traj| traj.state(t)),
        )
    }

    /// Orientation of the body at `t`, relative to its arc's body frame.
    pub fn orientation(&self, t: Second) -> Option<UnitQuaternion<f64>> {
        let arc = self.chronology.active_arc(t)?;
        Some(
            arc.rotation_model
                .as_ref()
                .map_or_else(UnitQuaternion::identity, |rot| rot.orientation(t)),
        )
    }
}

/// Position of `body` at `t` relative to the root of its center chain, in EME2000.
///
/// Each arc's offset is rotated from its trajectory frame when that frame is inertial.
/// Returns `None` when some body of the chain has no arc at `t`, a center has been
/// dropped, or a frame along the chain is not inertial.
pub fn absolute_position(body: &BodyHandle, t: Second) -> Option<Vector3<f64>> {
    let mut position = Vector3::zeros();
    let mut current = Rc::clone(body);

    for _ in 0..MAX_CENTER_CHAIN {
        let next = {
            let b = current.borrow();
            let arc = b.chronology().active_arc(t)?;
            let offset = b.relative_state(t)?.position;
            let rotation = arc.trajectory_frame.inertial_orientation()?;
            position += rotation * offset;

            let center = arc.center.upgrade()?;
            if Rc::ptr_eq(&center, &current) {
                return Some(position);
            }
            center
        };
        current = next;
    }
    None
}

#[cfg(test)]
mod body_test {
    use super::*;
    use crate::frames::Frame;

    fn arc(center: &BodyHandle, name: &str, offset: Vector3<f64>, duration: Second) -> Arc {
        Arc {
            center: BodyRef::new(name, center),
            trajectory: Some(Trajectory::FixedPoint(offset)),
            rotation_model: None,
            trajectory_frame: Frame::default_frame(),
            body_frame: Frame::default_frame(),
            duration,
        }
    }

    #[test]
    fn test_active_arc_is_half_open() {
        let sun = Body::new("Sun").into_handle();
        let mut chronology = Chronology::default();
        chronology.set_beginning(0.0);
        chronology.add_arc(arc(&sun, "Sun", Vector3::x(), 10.0));
        chronology.add_arc(arc(&sun, "Sun", Vector3::y(), 5.0));

        assert_eq!(chronology.arc_starts(), vec![0.0, 10.0]);
        assert_eq!(chronology.ending(), 15.0);
        assert!(chronology.active_arc(-1.0).is_none());
        assert_eq!(
            chronology.active_arc(9.999).and_then(|a| a.trajectory.clone()).map(|t| t.state(0.0).position),
            Some(Vector3::x())
        );
        assert_eq!(
            chronology.active_arc(10.0).and_then(|a| a.trajectory.clone()).map(|t| t.state(0.0).position),
            Some(Vector3::y())
        );
        assert!(chronology.active_arc(15.0).is_none());
    }

    #[test]
    fn test_reset_keeps_visualizers() {
        let mut body = Body::new("Voyager");
        body.set_visible(false);
        body.set_visualizer("axes", Visualizer::BodyAxes { size: 1.0 });
        body.set_geometry(Some(Geometry::Axes { scale: 1.0 }));
        body.reset();

        assert!(body.is_visible());
        assert!(body.geometry().is_none());
        assert!(body.visualizer("axes").is_some());
    }

    #[test]
    fn test_body_ref_follows_handle() {
        let earth = Body::new("Earth").into_handle();
        let r = BodyRef::new("Earth", &earth);
        assert!(r.refers_to(&earth));
        assert_eq!(r.name(), "Earth");
        drop(earth);
        assert!(r.upgrade().is_none());
    }

    #[test]
    fn test_absolute_position_chains_centers() {
        let sun = Body::new("Sun").into_handle();
        {
            let mut s = sun.borrow_mut();
            s.chronology_mut().add_arc(arc(&sun, "Sun", Vector3::zeros(), 1e12));
        }
        let earth = Body::new("Earth").into_handle();
        earth
            .borrow_mut()
            .chronology_mut()
            .add_arc(arc(&sun, "Sun", Vector3::new(100.0, 0.0, 0.0), 1e12));
        let moon = Body::new("Moon").into_handle();
        moon.borrow_mut()
            .chronology_mut()
            .add_arc(arc(&earth, "Earth", Vector3::new(0.0, 1.0, 0.0), 1e12));

        assert_eq!(absolute_position(&moon, 0.0), Some(Vector3::new(100.0, 1.0, 0.0)));
    }
}
