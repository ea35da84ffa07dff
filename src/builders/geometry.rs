use nalgebra::Vector3;
use serde_json::Value;

use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::constants::CLOUD_ALTITUDE;
use crate::geometry::particles::{ParticleEmitter, ParticleGenerator, ParticleSystem};
use crate::geometry::tiled_map::TiledMap;
use crate::geometry::{
    BaseMap, FrustumShape, Geometry, Globe, KeplerianSwarm, MeshInstance, PlanetaryRings,
    SensorFrustum, SwarmFormat,
};
use crate::loader::{LoadContext, UniverseLoader};
use crate::resources::{TextureHandle, TextureProperties};
use crate::values::{
    angle_value, bool_field, color_value, date_value, distance, distance_value, double_value,
    number, str_field, vec3_value, DistanceUnit, FieldMap, Spectrum,
};

impl UniverseLoader {
    /// Build a body geometry.
    ///
    /// Arguments
    /// -----------------
    /// * `map`: the geometry fields, dispatched on `type`
    /// * `catalog`: bodies a sensor may point at
    /// * `ctx`: the body being defined, which carries sensors; also used to report
    ///   problems that do not fail the whole geometry
    pub fn load_geometry(
        &mut self,
        map: &FieldMap,
        catalog: &UniverseCatalog,
        ctx: &LoadContext,
    ) -> Result<Geometry, CatalogError> {
        let kind = str_field(map, "type")
            .ok_or_else(|| CatalogError::missing("Bad or missing type for geometry."))?;
        match kind {
            "Globe" => self.load_globe(map, ctx).map(Geometry::Globe),
            "Mesh" => self.load_mesh(map).map(Geometry::Mesh),
            "Axes" => Ok(Geometry::Axes {
                scale: double_value(map.get("scale"), 1.0)?,
            }),
            "Sensor" => load_sensor(map, catalog, ctx).map(Geometry::Sensor),
            "KeplerianSwarm" => self.load_swarm(map).map(Geometry::KeplerianSwarm),
            "ParticleSystem" => self
                .load_particle_system(map, ctx)
                .map(Geometry::ParticleSystem),
            "Rings" => self.load_rings(map).map(Geometry::Rings),
            other => Err(CatalogError::invalid(format!(
                "Unknown type '{other}' for geometry."
            ))),
        }
    }

    fn texture(&self, name: &str, properties: TextureProperties) -> TextureHandle {
        let path = self.texture_file_name(name);
        self.resources().load_texture(path.as_str(), &properties)
    }

    fn load_globe(&mut self, map: &FieldMap, ctx: &LoadContext) -> Result<Globe, CatalogError> {
        let radii = match (map.get("radius"), map.get("radii")) {
            (Some(radius), _) => {
                Vector3::repeat(distance_value(Some(radius), DistanceUnit::Kilometer, 1.0)?)
            }
            (None, Some(radii)) => vec3_value(radii)
                .map_err(|_| CatalogError::invalid("Invalid radii given for globe geometry."))?,
            (None, None) => Vector3::zeros(),
        };
        let mut globe = Globe::new(radii);

        globe.base_map = match map.get("baseMap") {
            Some(Value::String(name)) => {
                Some(BaseMap::Texture(self.texture(name, TextureProperties::globe())))
            }
            Some(Value::Object(tiled)) => Some(BaseMap::Tiled(load_tiled_map(tiled)?)),
            _ => None,
        };

        globe.normal_map = str_field(map, "normalMap")
            .map(|name| self.texture(name, TextureProperties::normal_map()));
        globe.emissive = bool_field(map, "emissive").unwrap_or(false);

        if let Some(name) = str_field(map, "cloudMap") {
            globe.cloud_map = Some(self.texture(name, TextureProperties::globe()));
            globe.cloud_altitude = CLOUD_ALTITUDE;
        }

        globe.atmosphere = str_field(map, "atmosphere")
            .map(|name| self.data_file_name(name))
            .filter(|path| path.is_file());

        match map.get("ringSystem") {
            Some(Value::Object(rings)) => globe.ring_system = Some(self.load_rings(rings)?),
            Some(_) => self.error_message(ctx, "Error in definition of ringSystem"),
            None => {}
        }

        Ok(globe)
    }

    /// With a positive `size`, the mesh is scaled to fit a sphere of that radius;
    /// otherwise `scale` (default 1) is applied as is.
    fn load_mesh(&mut self, map: &FieldMap) -> Result<MeshInstance, CatalogError> {
        let size = distance_value(map.get("size"), DistanceUnit::Kilometer, 0.0)?;
        let scale = double_value(map.get("scale"), 1.0)?;
        let source = str_field(map, "source")
            .ok_or_else(|| CatalogError::missing("Missing source for mesh geometry"))?;

        let path = self.model_file_name(source);
        let (cache, resources) = self.mesh_cache_mut();
        let mesh = cache.get_or_load(&path, resources)?;

        let scale = if size > 0.0 && mesh.bounding_radius > 0.0 {
            size / mesh.bounding_radius
        } else {
            scale
        };
        Ok(MeshInstance { mesh, scale })
    }

    fn load_swarm(&self, map: &FieldMap) -> Result<KeplerianSwarm, CatalogError> {
        let source = str_field(map, "source")
            .ok_or_else(|| CatalogError::missing("Missing source for swarm geometry"))?;
        let format = match str_field(map, "format") {
            Some("astorb") => SwarmFormat::Astorb,
            Some("binary") => SwarmFormat::Binary,
            Some(_) => {
                return Err(CatalogError::invalid(
                    "Unknown format for Keplerian swarm geometry.",
                ))
            }
            None => return Err(CatalogError::missing("Missing format for swarm geometry")),
        };

        Ok(KeplerianSwarm {
            source: self.data_file_name(source),
            format,
            particle_size: double_value(map.get("particleSize"), 1.0)? as f32,
            color: color_value(map.get("color"), Spectrum::white())?,
            opacity: double_value(map.get("opacity"), 1.0)? as f32,
        })
    }

    /// Emitters that fail to build are reported and left out of the system.
    fn load_particle_system(
        &mut self,
        map: &FieldMap,
        ctx: &LoadContext,
    ) -> Result<ParticleSystem, CatalogError> {
        let emitters = match map.get("emitters") {
            Some(Value::Array(list)) => list,
            Some(_) => {
                return Err(CatalogError::invalid(
                    "Emitters in particle system must be an array",
                ))
            }
            None => {
                return Err(CatalogError::missing(
                    "Emitters are missing from particle system",
                ))
            }
        };

        let mut system = ParticleSystem::default();
        for value in emitters {
            let Some(emitter_map) = value.as_object() else {
                self.error_message(ctx, "Bad emitter in particle system");
                continue;
            };
            match self.load_emitter(emitter_map, ctx) {
                Ok(emitter) => {
                    let texture = str_field(emitter_map, "texture")
                        .map(|name| self.texture(name, TextureProperties::particles()));
                    system.emitters.push((emitter, texture));
                }
                Err(e) => self.error_message(ctx, e),
            }
        }
        Ok(system)
    }

    fn load_emitter(
        &mut self,
        map: &FieldMap,
        ctx: &LoadContext,
    ) -> Result<ParticleEmitter, CatalogError> {
        let spawn_rate = map
            .get("spawnRate")
            .ok_or_else(|| CatalogError::missing("Spawn rate not specified for particle emitter."))?;
        let lifetime = map
            .get("lifetime")
            .ok_or_else(|| CatalogError::missing("Lifetime not specified for particle emitter."))?;
        let generator = map.get("generator").and_then(Value::as_object).ok_or_else(|| {
            CatalogError::invalid("Invalid or missing generator for particle emitter.")
        })?;

        let mut emitter = ParticleEmitter::new(
            load_particle_generator(generator)?,
            number(lifetime).unwrap_or(0.0),
            number(spawn_rate).unwrap_or(0.0),
        )?;

        emitter.start_size = distance_value(map.get("startSize"), DistanceUnit::Kilometer, 0.0)?;
        emitter.end_size = distance_value(map.get("endSize"), DistanceUnit::Kilometer, 1.0)?;
        emitter.start_time = map.get("startTime").map(date_value).transpose()?;
        emitter.end_time = map.get("endTime").map(date_value).transpose()?;
        emitter.velocity_variation = double_value(map.get("velocityVariation"), 0.0)?;
        emitter.trace_length = double_value(map.get("trace"), 0.0)?;
        if let Some(force) = map.get("force") {
            emitter.force = vec3_value(force)?;
        }
        emitter.emissive = bool_field(map, "emissive").unwrap_or(false);

        // [color, opacity, color, opacity, …]
        if let Some(Value::Array(ramp)) = map.get("colors") {
            let colors = ramp
                .chunks_exact(2)
                .map(|pair| {
                    let color = color_value(Some(&pair[0]), Spectrum::white())?;
                    Ok((color, double_value(Some(&pair[1]), 1.0)? as f32))
                })
                .collect::<Result<Vec<_>, CatalogError>>()?;
            emitter.set_colors(colors);
        }

        if let Some(phase) = map.get("phaseAsymmetry").and_then(number) {
            if phase > -1.0 && phase < 1.0 {
                emitter.phase_asymmetry = phase as f32;
            } else {
                self.error_message(ctx, "Value for phaseAsymmetry must be between -1 and 1");
            }
        }

        Ok(emitter)
    }

    fn load_rings(&self, map: &FieldMap) -> Result<PlanetaryRings, CatalogError> {
        let inner = map
            .get("innerRadius")
            .ok_or_else(|| CatalogError::missing("innerRadius missing for ring system"))?;
        let outer = map
            .get("outerRadius")
            .ok_or_else(|| CatalogError::missing("outerRadius missing for ring system"))?;
        let texture = str_field(map, "texture")
            .ok_or_else(|| CatalogError::missing("texture missing for ring system"))?;

        Ok(PlanetaryRings {
            inner_radius: distance(inner, DistanceUnit::Kilometer).map_err(|_| {
                CatalogError::invalid("Bad value for inner radius of ring system")
            })?,
            outer_radius: distance(outer, DistanceUnit::Kilometer).map_err(|_| {
                CatalogError::invalid("Bad value for outer radius of ring system")
            })?,
            texture: self.texture(texture, TextureProperties::rings()),
        })
    }
}

fn load_sensor(
    map: &FieldMap,
    catalog: &UniverseCatalog,
    ctx: &LoadContext,
) -> Result<SensorFrustum, CatalogError> {
    let target = str_field(map, "target")
        .ok_or_else(|| CatalogError::missing("Bad or missing target for sensor geometry"))?;
    let range = map
        .get("range")
        .and_then(|v| distance(v, DistanceUnit::Kilometer).ok())
        .ok_or_else(|| CatalogError::invalid("Bad or missing range for sensor geometry"))?;
    let target = catalog
        .find_ref(target)
        .ok_or_else(|| CatalogError::unresolved("Target for sensor geometry", target))?;

    let shape = match str_field(map, "shape") {
        Some("rectangular") => FrustumShape::Rectangular,
        _ => FrustumShape::Elliptical,
    };
    let default_fov = 5.0_f64.to_radians();

    Ok(SensorFrustum {
        source: ctx.item.as_deref().and_then(|name| catalog.find_ref(name)),
        target,
        range,
        shape,
        horizontal_fov: angle_value(map.get("horizontalFov"), default_fov)?,
        vertical_fov: angle_value(map.get("verticalFov"), default_fov)?,
        color: color_value(map.get("frustumColor"), Spectrum::white())?,
        opacity: double_value(map.get("frustumOpacity"), 0.3)?,
        grid_opacity: double_value(map.get("gridOpacity"), 0.15)?,
    })
}

fn load_tiled_map(map: &FieldMap) -> Result<TiledMap, CatalogError> {
    let int_field = |key: &str, message: &str| {
        map.get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| CatalogError::invalid(message))
    };
    let string_field = |key: &str, message: &str| {
        str_field(map, key).ok_or_else(|| CatalogError::invalid(message))
    };

    match str_field(map, "type") {
        Some("WMS") => Ok(TiledMap::wms(
            string_field("layer", "Bad or missing layer name for WMS tiled texture")?,
            int_field("levelCount", "Bad or missing level count for WMS tiled texture")?,
            int_field("tileSize", "Bad or missing tile size for WMS tiled texture")?,
        )),
        Some("MultiWMS") => Ok(TiledMap::multi_wms(
            string_field("baseLayer", "Bad or missing base layer name for MultiWMS tiled texture")?,
            int_field("baseLevelCount", "Bad or missing base level count for MultiWMS tiled texture")?,
            string_field("detailLayer", "Bad or missing detail layer name for MultiWMS tiled texture")?,
            int_field("detailLevelCount", "Bad or missing detail level count for MultiWMS tiled texture")?,
            int_field("tileSize", "Bad or missing tile size for MultiWMS tiled texture")?,
        )),
        _ => Err(CatalogError::invalid("Unknown tiled map type.")),
    }
}

fn load_particle_generator(map: &FieldMap) -> Result<ParticleGenerator, CatalogError> {
    let kind = str_field(map, "type")
        .ok_or_else(|| CatalogError::missing("Missing type for particle generator."))?;
    let vector = |key: &str| {
        map.get(key)
            .map_or(Ok(Vector3::zeros()), vec3_value)
    };

    match kind {
        "Point" => Ok(ParticleGenerator::Point {
            position: vector("position")?,
            velocity: vector("velocity")?,
        }),
        "Box" => Ok(ParticleGenerator::Box {
            sides: vector("sides")?,
            center: vector("center")?,
            velocity: vector("velocity")?,
        }),
        "Disc" => Ok(ParticleGenerator::Disc {
            radius: double_value(map.get("radius"), 0.0)?,
            velocity: vector("velocity")?,
        }),
        "Strip" => ParticleGenerator::strip(&numeric_list(
            map,
            "states",
            "Missing states for strip particle generator",
            "Strip particles states must be a list of numbers",
        )?),
        "ArcStrip" => ParticleGenerator::arc_strip(&numeric_list(
            map,
            "arcs",
            "Missing arcs for arc strip particle generator",
            "Arc strip particles arcs must be a list of numbers",
        )?),
        other => Err(CatalogError::unknown_type("particle generator", other)),
    }
}

fn numeric_list(
    map: &FieldMap,
    key: &str,
    missing: &str,
    invalid: &str,
) -> Result<Vec<f64>, CatalogError> {
    let list = map
        .get(key)
        .ok_or_else(|| CatalogError::missing(missing))?
        .as_array()
        .ok_or_else(|| CatalogError::invalid(invalid))?;
    list.iter()
        .map(|v| number(v).ok_or_else(|| CatalogError::invalid(invalid)))
        .collect()
}
