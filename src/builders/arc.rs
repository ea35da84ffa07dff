use serde_json::Value;

use crate::body::Arc;
use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::constants::{Second, DEFAULT_END_TIME};
use crate::frames::{Frame, FrameRef};
use crate::loader::UniverseLoader;
use crate::values::{date_value, str_field, FieldMap};

use super::resolve_body;

impl UniverseLoader {
    /// Build an arc starting at `start_time`.
    ///
    /// Arguments
    /// -----------------
    /// * `map`: the arc fields: `center` (required), `trajectory`, `rotationModel`,
    ///   `trajectoryFrame`, `bodyFrame` and `endTime`
    /// * `catalog`: bodies the center and frames may refer to
    /// * `start_time`: TDB seconds; the arc lasts until `endTime`, 2100 by default
    pub fn load_arc(
        &mut self,
        map: &FieldMap,
        catalog: &UniverseCatalog,
        start_time: Second,
    ) -> Result<Arc, CatalogError> {
        let center_name = str_field(map, "center")
            .ok_or_else(|| CatalogError::missing("Missing center for object."))?;
        let center = resolve_body(catalog, center_name, "Center body")?;

        let trajectory = match map.get("trajectory") {
            Some(Value::Object(traj)) => Some(self.load_trajectory(traj)?),
            Some(_) => return Err(CatalogError::invalid("Invalid trajectory for arc.")),
            None => None,
        };

        let rotation_model = match map.get("rotationModel") {
            Some(Value::Object(rot)) => Some(self.load_rotation_model(rot)?),
            Some(_) => return Err(CatalogError::invalid("Invalid rotation model for arc.")),
            None => None,
        };

        let trajectory_frame = self.optional_frame(map.get("trajectoryFrame"), catalog)?;
        let body_frame = self.optional_frame(map.get("bodyFrame"), catalog)?;

        let end_time = match map.get("endTime") {
            Some(value) => {
                date_value(value).map_err(|_| CatalogError::invalid("Invalid endTime specified."))?
            }
            None => DEFAULT_END_TIME,
        };
        if end_time <= start_time {
            return Err(CatalogError::invalid("End time must be after the start time"));
        }

        Ok(Arc {
            center,
            trajectory,
            rotation_model,
            trajectory_frame,
            body_frame,
            duration: end_time - start_time,
        })
    }

    /// Build consecutive arcs, each starting where the previous one ends. Any bad arc
    /// fails the whole list.
    pub fn load_chronology(
        &mut self,
        list: &[Value],
        catalog: &UniverseCatalog,
        start_time: Second,
    ) -> Result<Vec<Arc>, CatalogError> {
        let mut next_start = start_time;
        list.iter()
            .map(|value| {
                let map = value
                    .as_object()
                    .ok_or_else(|| CatalogError::invalid("Invalid arc in arcs list."))?;
                let arc = self.load_arc(map, catalog, next_start)?;
                next_start += arc.duration;
                Ok(arc)
            })
            .collect()
    }

    fn optional_frame(
        &self,
        value: Option<&Value>,
        catalog: &UniverseCatalog,
    ) -> Result<FrameRef, CatalogError> {
        value.map_or_else(
            || Ok(Frame::default_frame()),
            |v| self.load_frame_value(v, catalog),
        )
    }
}

#[cfg(test)]
mod arc_builder_test {
    use super::*;
    use crate::body::Body;
    use crate::constants::{DEFAULT_START_TIME, SECONDS_PER_DAY};
    use crate::frames::InertialFrame;
    use crate::time::jd_to_tdb_seconds;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn catalog() -> UniverseCatalog {
        let mut catalog = UniverseCatalog::new();
        catalog.add_body("Sun", Body::new("Sun"));
        catalog
    }

    #[test]
    fn test_single_arc_defaults() {
        let mut loader = UniverseLoader::new();
        let arc = loader
            .load_arc(&map(json!({ "center": "Sun" })), &catalog(), DEFAULT_START_TIME)
            .unwrap();
        assert_eq!(arc.center.name(), "Sun");
        assert!(arc.trajectory.is_none());
        assert!(matches!(
            *arc.trajectory_frame,
            Frame::Inertial(InertialFrame::EquatorJ2000)
        ));
        assert_relative_eq!(arc.duration, DEFAULT_END_TIME - DEFAULT_START_TIME);
    }

    #[test]
    fn test_arc_errors() {
        let mut loader = UniverseLoader::new();
        let catalog = catalog();

        assert_eq!(
            loader.load_arc(&map(json!({})), &catalog, 0.0).unwrap_err(),
            CatalogError::missing("Missing center for object.")
        );
        assert_eq!(
            loader
                .load_arc(&map(json!({ "center": "Vega" })), &catalog, 0.0)
                .unwrap_err()
                .to_string(),
            "Center body 'Vega' not found"
        );
        assert_eq!(
            loader
                .load_arc(&map(json!({ "center": "Sun", "endTime": 2451545.0 })), &catalog, 10.0)
                .unwrap_err(),
            CatalogError::invalid("End time must be after the start time")
        );
    }

    #[test]
    fn test_chronology_is_contiguous() {
        let mut loader = UniverseLoader::new();
        let list = vec![
            json!({ "center": "Sun", "endTime": 2451546.0 }),
            json!({ "center": "Sun", "endTime": 2451548.0, "trajectoryFrame": "EclipticJ2000" }),
        ];
        let arcs = loader
            .load_chronology(&list, &catalog(), jd_to_tdb_seconds(2451545.0))
            .unwrap();
        assert_eq!(arcs.len(), 2);
        assert_relative_eq!(arcs[0].duration, SECONDS_PER_DAY);
        assert_relative_eq!(arcs[1].duration, 2.0 * SECONDS_PER_DAY);

        let broken = vec![json!({ "center": "Sun", "endTime": 2451546.0 }), json!(3)];
        assert_eq!(
            loader.load_chronology(&broken, &catalog(), 0.0).unwrap_err(),
            CatalogError::invalid("Invalid arc in arcs list.")
        );
    }
}
