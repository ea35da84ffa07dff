//! Particle system descriptors.
//!
//! A particle system is a list of emitters. Each emitter spawns particles at a fixed
//! rate from an initial-state generator; particles live for a fixed time while their
//! size and color are interpolated along ramps.

use itertools::Itertools;
use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::catalog_errors::CatalogError;
use crate::constants::{Kilometer, Second, MAX_PARTICLES_PER_EMITTER};
use crate::resources::TextureHandle;
use crate::trajectories::Trajectory;
use crate::values::Spectrum;

/// Most color ramp entries an emitter keeps
pub const MAX_COLOR_RAMP: usize = 5;

/// Source of initial particle positions and velocities.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleGenerator {
    Point {
        position: Vector3<f64>,
        velocity: Vector3<f64>,
    },
    Box {
        sides: Vector3<f64>,
        center: Vector3<f64>,
        velocity: Vector3<f64>,
    },
    Disc {
        radius: Kilometer,
        velocity: Vector3<f64>,
    },
    /// Particles spawned along the polyline through the `(position, velocity)` states
    Strip { states: Vec<(Vector3<f64>, Vector3<f64>)> },
    /// Particles spawned along great-circle arcs through the given points
    ArcStrip {
        positions: Vec<Vector3<f64>>,
        speeds: Vec<f64>,
    },
}

impl ParticleGenerator {
    /// Build a strip from a flat list `[x, y, z, vx, vy, vz, …]` of at least two states.
    pub fn strip(values: &[f64]) -> Result<Self, CatalogError> {
        if values.len() < 12 || values.len() % 6 != 0 {
            return Err(CatalogError::invalid(
                "Bad number of values in states list for strip particle generator",
            ));
        }
        let states = values
            .iter()
            .tuples()
            .map(|(x, y, z, vx, vy, vz)| (Vector3::new(*x, *y, *z), Vector3::new(*vx, *vy, *vz)))
            .collect();
        Ok(ParticleGenerator::Strip { states })
    }

    /// Build an arc strip from a flat list `[latitude°, longitude°, radius, speed, …]` of
    /// at least two points.
    pub fn arc_strip(values: &[f64]) -> Result<Self, CatalogError> {
        if values.len() < 8 || values.len() % 4 != 0 {
            return Err(CatalogError::invalid(
                "Bad number of values in arcs list for arc strip particle generator",
            ));
        }
        let (positions, speeds) = values
            .iter()
            .tuples()
            .map(|(lat, lon, radius, speed)| {
                (
                    Trajectory::spherical_position(lat.to_radians(), lon.to_radians(), *radius),
                    *speed,
                )
            })
            .unzip();
        Ok(ParticleGenerator::ArcStrip { positions, speeds })
    }
}

/// One emitter of a particle system.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter {
    pub generator: ParticleGenerator,
    /// Seconds
    pub lifetime: Second,
    /// Particles per second
    pub spawn_rate: f64,
    pub start_size: Kilometer,
    pub end_size: Kilometer,
    pub start_time: Option<Second>,
    pub end_time: Option<Second>,
    pub velocity_variation: f64,
    pub trace_length: f64,
    pub force: Vector3<f64>,
    pub colors: SmallVec<[(Spectrum, f32); MAX_COLOR_RAMP]>,
    pub emissive: bool,
    pub phase_asymmetry: f32,
}

impl ParticleEmitter {
    /// Create an emitter with default optional parameters.
    ///
    /// Return
    /// ----------
    /// * the emitter, or an error when the lifetime or spawn rate is not positive or the
    ///   emitter would keep more than 200 000 particles alive
    pub fn new(
        generator: ParticleGenerator,
        lifetime: Second,
        spawn_rate: f64,
    ) -> Result<Self, CatalogError> {
        if !(lifetime > 0.0) {
            return Err(CatalogError::invalid(
                "Particle lifetime must be a positive value.",
            ));
        }
        if !(spawn_rate > 0.0) {
            return Err(CatalogError::invalid(
                "Particle spawn rate must be a positive value.",
            ));
        }
        if lifetime * spawn_rate > MAX_PARTICLES_PER_EMITTER {
            return Err(CatalogError::invalid(
                "200K particle per emitter rate exceeded. Reduce particle spawn rate.",
            ));
        }

        let mut colors = SmallVec::new();
        colors.push((Spectrum::white(), 1.0));

        Ok(ParticleEmitter {
            generator,
            lifetime,
            spawn_rate,
            start_size: 0.0,
            end_size: 1.0,
            start_time: None,
            end_time: None,
            velocity_variation: 0.0,
            trace_length: 0.0,
            force: Vector3::zeros(),
            colors,
            emissive: false,
            phase_asymmetry: 0.0,
        })
    }

    /// Replace the color ramp, keeping at most [`MAX_COLOR_RAMP`] entries. An empty ramp
    /// leaves the default white ramp in place.
    pub fn set_colors(&mut self, ramp: impl IntoIterator<Item = (Spectrum, f32)>) {
        let ramp: SmallVec<[(Spectrum, f32); MAX_COLOR_RAMP]> =
            ramp.into_iter().take(MAX_COLOR_RAMP).collect();
        if !ramp.is_empty() {
            self.colors = ramp;
        }
    }

    /// Largest number of particles alive at once.
    pub fn max_particles(&self) -> usize {
        (self.lifetime * self.spawn_rate).ceil() as usize
    }
}

/// Emitters with the texture each one draws its particles with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleSystem {
    pub emitters: Vec<(ParticleEmitter, Option<TextureHandle>)>,
}

#[cfg(test)]
mod particles_test {
    use super::*;
    use approx::assert_relative_eq;

    fn point() -> ParticleGenerator {
        ParticleGenerator::Point {
            position: Vector3::zeros(),
            velocity: Vector3::x(),
        }
    }

    #[test]
    fn test_emitter_limits() {
        assert!(ParticleEmitter::new(point(), 0.0, 10.0).is_err());
        assert!(ParticleEmitter::new(point(), 10.0, -1.0).is_err());
        assert_eq!(
            ParticleEmitter::new(point(), 100.0, 2001.0),
            Err(CatalogError::invalid(
                "200K particle per emitter rate exceeded. Reduce particle spawn rate."
            ))
        );
        let emitter = ParticleEmitter::new(point(), 100.0, 2000.0).unwrap();
        assert_eq!(emitter.max_particles(), 200_000);
    }

    #[test]
    fn test_color_ramp_is_capped() {
        let mut emitter = ParticleEmitter::new(point(), 1.0, 1.0).unwrap();
        emitter.set_colors((0..8).map(|i| (Spectrum::black(), i as f32)));
        assert_eq!(emitter.colors.len(), MAX_COLOR_RAMP);
        assert_eq!(emitter.colors[4].1, 4.0);

        emitter.set_colors(std::iter::empty());
        assert_eq!(emitter.colors.len(), MAX_COLOR_RAMP);
    }

    #[test]
    fn test_strip_generators() {
        assert!(ParticleGenerator::strip(&[0.0; 6]).is_err());
        assert!(ParticleGenerator::strip(&[0.0; 13]).is_err());
        match ParticleGenerator::strip(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0])
            .unwrap()
        {
            ParticleGenerator::Strip { states } => {
                assert_eq!(states.len(), 2);
                assert_eq!(states[0].1, Vector3::new(4.0, 5.0, 6.0));
            }
            other => panic!("unexpected generator {other:?}"),
        }

        assert!(ParticleGenerator::arc_strip(&[0.0; 4]).is_err());
        match ParticleGenerator::arc_strip(&[0.0, 90.0, 2.0, 1.0, 90.0, 0.0, 3.0, 5.0]).unwrap() {
            ParticleGenerator::ArcStrip { positions, speeds } => {
                assert_relative_eq!(positions[0], Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
                assert_relative_eq!(positions[1], Vector3::new(0.0, 0.0, 3.0), epsilon = 1e-12);
                assert_eq!(speeds, vec![1.0, 5.0]);
            }
            other => panic!("unexpected generator {other:?}"),
        }
    }
}
