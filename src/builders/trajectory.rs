use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog_errors::CatalogError;
use crate::constants::J2000_JD;
use crate::loader::tle_updates::tle_key;
use crate::loader::UniverseLoader;
use crate::time::jd_to_tdb_seconds;
use crate::trajectories::keplerian::KeplerianOrbit;
use crate::trajectories::sampled_file::{load_sampled_trajectory, SampledFormat};
use crate::trajectories::tle::TleTrajectory;
use crate::trajectories::Trajectory;
use crate::values::{
    angle_value, date_value, distance, distance_value, double_value, duration, str_field,
    vec3_value, DistanceUnit, FieldMap, TimeUnit,
};

use super::type_field;

impl UniverseLoader {
    /// Build a trajectory from its catalog map.
    pub fn load_trajectory(&mut self, map: &FieldMap) -> Result<Trajectory, CatalogError> {
        match type_field(map, "Trajectory definition is missing type.")? {
            "FixedPoint" => load_fixed_point(map),
            "FixedSpherical" => load_fixed_spherical(map),
            "Keplerian" => load_keplerian(map),
            "Builtin" => self.load_builtin_trajectory(map),
            "InterpolatedStates" => self.load_interpolated_states(map),
            "TLE" => self.load_tle_trajectory(map),
            other => Err(CatalogError::unknown_type("trajectory", other)),
        }
    }

    fn load_builtin_trajectory(&self, map: &FieldMap) -> Result<Trajectory, CatalogError> {
        let name = str_field(map, "name")
            .ok_or_else(|| CatalogError::missing("Builtin trajectory is missing name."))?;
        let trajectory = self
            .builtin_orbit(name)
            .ok_or_else(|| CatalogError::unresolved("Builtin trajectory", name))?;
        Ok(Trajectory::Builtin {
            name: name.to_string(),
            trajectory,
        })
    }

    fn load_interpolated_states(&self, map: &FieldMap) -> Result<Trajectory, CatalogError> {
        let source = str_field(map, "source").ok_or_else(|| {
            CatalogError::missing("No source file specified for sampled trajectory.")
        })?;
        let format = SampledFormat::from_path(source)
            .ok_or_else(|| CatalogError::invalid("Unknown sampled trajectory format."))?;

        let table = load_sampled_trajectory(&self.data_file_name(source), format)?;
        Ok(Trajectory::InterpolatedStates(Rc::new(table)))
    }

    /// A TLE trajectory. With a `source`, cached lines for the same source and name
    /// replace the catalog's lines, an uncached source is requested from the host, and
    /// the instance is kept so that later updates reach it.
    fn load_tle_trajectory(&mut self, map: &FieldMap) -> Result<Trajectory, CatalogError> {
        let name = str_field(map, "name")
            .ok_or_else(|| CatalogError::missing("Bad or missing name for TLE trajectory"))?;
        let mut line1 = str_field(map, "line1").ok_or_else(|| {
            CatalogError::missing("Bad or missing first line (line1) for TLE trajectory")
        })?;
        let mut line2 = str_field(map, "line2").ok_or_else(|| {
            CatalogError::missing("Bad or missing second line (line2) for TLE trajectory")
        })?;
        let source = str_field(map, "source").filter(|s| !s.is_empty());

        let key = source.map(|source| tle_key(source, name));
        let cached = key.as_ref().and_then(|key| self.tle_cache.get(key)).cloned();
        match (&cached, source) {
            (Some(record), _) => {
                line1 = &record.line1;
                line2 = &record.line2;
            }
            (None, Some(source)) => {
                self.resource_requests.insert(source.to_string());
            }
            (None, None) => {}
        }

        let tle = TleTrajectory::parse(name, line1, line2)
            .map_err(|_| CatalogError::InvalidTle(name.to_string()))?;
        let handle = Rc::new(RefCell::new(tle));

        if let Some(key) = key {
            self.register_tle(key, &handle);
        }
        Ok(Trajectory::Tle(handle))
    }
}

fn load_fixed_point(map: &FieldMap) -> Result<Trajectory, CatalogError> {
    let position = map
        .get("position")
        .and_then(|v| vec3_value(v).ok())
        .ok_or_else(|| {
            CatalogError::invalid("Invalid or missing position given for FixedPoint trajectory.")
        })?;
    Ok(Trajectory::FixedPoint(position))
}

fn load_fixed_spherical(map: &FieldMap) -> Result<Trajectory, CatalogError> {
    let latitude = angle_value(map.get("latitude"), 0.0).map_err(|_| {
        CatalogError::invalid("Bad or missing latitude for FixedSpherical trajectory")
    })?;
    let longitude = angle_value(map.get("longitude"), 0.0).map_err(|_| {
        CatalogError::invalid("Bad or missing longitude for FixedSpherical trajectory")
    })?;
    let radius = distance_value(map.get("radius"), DistanceUnit::Kilometer, 0.0).map_err(|_| {
        CatalogError::invalid("Bad or missing radius for FixedSpherical trajectory")
    })?;
    Ok(Trajectory::FixedSpherical {
        latitude,
        longitude,
        radius,
    })
}

/// Two-body orbit. `semiMajorAxis` (km by default) and `period` (days by default) are
/// required; other elements default to zero and the epoch to J2000.
fn load_keplerian(map: &FieldMap) -> Result<Trajectory, CatalogError> {
    let semi_major_axis = map
        .get("semiMajorAxis")
        .map(|v| distance(v, DistanceUnit::Kilometer))
        .and_then(Result::ok)
        .ok_or_else(|| CatalogError::invalid("Missing or invalid semi-major axis for Keplerian orbit."))?;
    let period = map
        .get("period")
        .map(|v| duration(v, TimeUnit::Day))
        .and_then(Result::ok)
        .ok_or_else(|| CatalogError::invalid("Missing or invalid period for Keplerian orbit."))?;

    let epoch = match map.get("epoch") {
        Some(value) => date_value(value)
            .map_err(|_| CatalogError::invalid("Invalid epoch for Keplerian orbit."))?,
        None => jd_to_tdb_seconds(J2000_JD),
    };

    let element = |key: &str| angle_value(map.get(key), 0.0);
    let orbit = KeplerianOrbit::from_semi_major_axis(
        semi_major_axis,
        period,
        double_value(map.get("eccentricity"), 0.0)
            .map_err(|_| CatalogError::invalid("Invalid eccentricity for Keplerian orbit."))?,
        element("inclination")?,
        element("ascendingNode")?,
        element("argumentOfPeriapsis")?,
        element("meanAnomaly")?,
        epoch,
    )?;
    Ok(Trajectory::Keplerian(orbit))
}

#[cfg(test)]
mod trajectory_builder_test {
    use super::*;
    use crate::constants::{DPI, SECONDS_PER_DAY};
    use crate::trajectories::tle::tle_test::{ISS_LINE1, ISS_LINE2};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use serde_json::{json, Value};

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_keplerian_fields() {
        let mut loader = UniverseLoader::new();
        let traj = loader
            .load_trajectory(&map(json!({
                "type": "Keplerian",
                "semiMajorAxis": "1au",
                "period": "1y",
                "eccentricity": 0.5,
                "inclination": 90.0
            })))
            .unwrap();
        match traj {
            Trajectory::Keplerian(orbit) => {
                assert_relative_eq!(orbit.periapsis_distance, 0.5 * crate::constants::AU);
                assert_relative_eq!(orbit.mean_motion, DPI / (365.25 * SECONDS_PER_DAY));
                assert_relative_eq!(orbit.inclination, std::f64::consts::FRAC_PI_2);
                assert_eq!(orbit.epoch, 0.0);
            }
            other => panic!("unexpected trajectory {other:?}"),
        }

        assert_eq!(
            loader
                .load_trajectory(&map(json!({ "type": "Keplerian", "period": 10 })))
                .unwrap_err(),
            CatalogError::invalid("Missing or invalid semi-major axis for Keplerian orbit.")
        );
    }

    #[test]
    fn test_malformed_eccentricity_is_rejected() {
        let mut loader = UniverseLoader::new();
        let mut orbit = json!({
            "type": "Keplerian",
            "semiMajorAxis": "1au",
            "period": "1y",
            "eccentricity": "0.5x"
        });
        assert_eq!(
            loader.load_trajectory(&map(orbit.clone())).unwrap_err(),
            CatalogError::invalid("Invalid eccentricity for Keplerian orbit.")
        );

        orbit["eccentricity"] = json!("0.5");
        match loader.load_trajectory(&map(orbit)).unwrap() {
            Trajectory::Keplerian(orbit) => {
                assert_relative_eq!(orbit.periapsis_distance, 0.5 * crate::constants::AU)
            }
            other => panic!("unexpected trajectory {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_errors() {
        let mut loader = UniverseLoader::new();
        assert_eq!(
            loader.load_trajectory(&map(json!({ "type": "Spiral" }))).unwrap_err(),
            CatalogError::unknown_type("trajectory", "Spiral")
        );
        assert_eq!(
            loader.load_trajectory(&map(json!({ "position": [1, 2, 3] }))).unwrap_err(),
            CatalogError::missing("Trajectory definition is missing type.")
        );
        assert_eq!(
            loader
                .load_trajectory(&map(json!({ "type": "Builtin", "name": "Vulcan" })))
                .unwrap_err()
                .to_string(),
            "Builtin trajectory 'Vulcan' not found"
        );
        assert_eq!(
            loader
                .load_trajectory(&map(json!({ "type": "InterpolatedStates", "source": "a.txt" })))
                .unwrap_err(),
            CatalogError::invalid("Unknown sampled trajectory format.")
        );
    }

    #[test]
    fn test_fixed_and_builtin() {
        let mut loader = UniverseLoader::new();
        loader.add_builtin_orbit("Here", Trajectory::FixedPoint(Vector3::x()));

        let builtin = loader
            .load_trajectory(&map(json!({ "type": "Builtin", "name": "Here" })))
            .unwrap();
        assert_eq!(builtin.kind(), "Builtin");
        assert_eq!(builtin.state(0.0).position, Vector3::x());

        let sph = loader
            .load_trajectory(&map(json!({
                "type": "FixedSpherical", "latitude": 0, "longitude": 90, "radius": "2km"
            })))
            .unwrap();
        assert_relative_eq!(sph.state(0.0).position, Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-12);

        assert!(loader
            .load_trajectory(&map(json!({ "type": "FixedPoint", "position": [1, 2] })))
            .is_err());
    }

    #[test]
    fn test_tle_source_is_requested_and_tracked() {
        let mut loader = UniverseLoader::new();
        let tle = map(json!({
            "type": "TLE", "name": "ISS", "source": "stations.txt",
            "line1": ISS_LINE1, "line2": ISS_LINE2
        }));
        let live = loader.load_trajectory(&tle).unwrap();
        assert!(loader.resource_requests().contains("stations.txt"));
        assert_eq!(loader.live_tle_count("stations.txt", "ISS"), 1);
        drop(live);
        assert_eq!(loader.live_tle_count("stations.txt", "ISS"), 0);

        let bad = map(json!({ "type": "TLE", "name": "Junk", "line1": "1", "line2": "2" }));
        assert_eq!(
            loader.load_trajectory(&bad).unwrap_err().to_string(),
            "Invalid TLE data for 'Junk'"
        );
    }
}
