//! # Body geometry descriptors
//!
//! The catalog records *what* a body looks like; drawing it is the host's job. Each
//! [`Geometry`] variant keeps the resolved parameters and the texture or mesh handles
//! returned by the host's [`crate::resources::ResourceLoader`].
//!
//! Modules
//! -----------------
//! * [`tiled_map`] – WMS tiled base maps with their level and tile size limits.
//! * [`particles`] – particle emitters and initial-state generators.
//! * [`mesh_cache`] – meshes shared between bodies, keyed by path.

pub mod mesh_cache;
pub mod particles;
pub mod tiled_map;

use std::rc::Rc;

use camino::Utf8PathBuf;
use nalgebra::Vector3;

use crate::body::BodyRef;
use crate::constants::{Kilometer, Radian};
use crate::resources::{MeshHandle, TextureHandle};
use crate::values::Spectrum;

use particles::ParticleSystem;
use tiled_map::TiledMap;

#[derive(Debug, Clone, PartialEq)]
pub enum BaseMap {
    Texture(TextureHandle),
    Tiled(TiledMap),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetaryRings {
    pub inner_radius: Kilometer,
    pub outer_radius: Kilometer,
    pub texture: TextureHandle,
}

/// Ellipsoidal world.
#[derive(Debug, Clone, PartialEq)]
pub struct Globe {
    /// Full axis lengths (twice the radii), in km
    pub ellipsoid: Vector3<f64>,
    pub base_map: Option<BaseMap>,
    pub normal_map: Option<TextureHandle>,
    pub emissive: bool,
    pub cloud_map: Option<TextureHandle>,
    pub cloud_altitude: Kilometer,
    /// Atmosphere scattering table, recorded when the file exists
    pub atmosphere: Option<Utf8PathBuf>,
    pub ring_system: Option<PlanetaryRings>,
}

impl Globe {
    pub fn new(radii: Vector3<f64>) -> Self {
        Globe {
            ellipsoid: radii * 2.0,
            base_map: None,
            normal_map: None,
            emissive: false,
            cloud_map: None,
            cloud_altitude: 0.0,
            atmosphere: None,
            ring_system: None,
        }
    }

    /// Largest semi-axis of the ellipsoid
    pub fn max_radius(&self) -> Kilometer {
        self.ellipsoid.max() / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub mesh: Rc<MeshHandle>,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrustumShape {
    #[default]
    Elliptical,
    Rectangular,
}

/// Field of view of an instrument carried by a body, pointed at a target body.
#[derive(Debug, Clone)]
pub struct SensorFrustum {
    /// Body carrying the sensor
    pub source: Option<BodyRef>,
    pub target: BodyRef,
    pub range: Kilometer,
    pub shape: FrustumShape,
    pub horizontal_fov: Radian,
    pub vertical_fov: Radian,
    pub color: Spectrum,
    pub opacity: f64,
    pub grid_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmFormat {
    /// Lowell Observatory `astorb.dat` text
    Astorb,
    /// Pre-digested binary element file
    Binary,
}

/// Large set of minor bodies drawn as points from their orbital elements.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerianSwarm {
    pub source: Utf8PathBuf,
    pub format: SwarmFormat,
    pub particle_size: f32,
    pub color: Spectrum,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub enum Geometry {
    Globe(Globe),
    Mesh(MeshInstance),
    Axes { scale: f64 },
    Sensor(SensorFrustum),
    KeplerianSwarm(KeplerianSwarm),
    ParticleSystem(ParticleSystem),
    Rings(PlanetaryRings),
}

impl Geometry {
    /// Full ellipsoid axes, for geometries with an ellipsoidal shape.
    pub fn ellipsoid(&self) -> Option<Vector3<f64>> {
        match self {
            Geometry::Globe(globe) => Some(globe.ellipsoid),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Globe(_) => "Globe",
            Geometry::Mesh(_) => "Mesh",
            Geometry::Axes { .. } => "Axes",
            Geometry::Sensor(_) => "Sensor",
            Geometry::KeplerianSwarm(_) => "KeplerianSwarm",
            Geometry::ParticleSystem(_) => "ParticleSystem",
            Geometry::Rings(_) => "Rings",
        }
    }
}
