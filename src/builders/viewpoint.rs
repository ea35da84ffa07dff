use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::loader::UniverseLoader;
use crate::values::{angle_value, number, str_field, FieldMap};
use crate::viewpoint::{UpVector, Viewpoint};

use super::resolve_body;

impl UniverseLoader {
    /// Build a named viewpoint.
    ///
    /// The catalog gives an `altitude`; when the center body has an ellipsoidal geometry
    /// the stored distance is measured from its center, so the largest radius is added.
    /// `azimuth` and `elevation` are given in degrees.
    pub fn load_viewpoint(
        &self,
        item: &FieldMap,
        catalog: &UniverseCatalog,
    ) -> Result<Viewpoint, CatalogError> {
        let name = str_field(item, "name")
            .ok_or_else(|| CatalogError::missing("Viewpoint is missing name"))?;
        let center_name = str_field(item, "center")
            .ok_or_else(|| CatalogError::missing("Viewpoint is missing center body"))?;
        let reference_name = str_field(item, "reference")
            .ok_or_else(|| CatalogError::missing("Viewpoint is missing reference body"))?;
        let altitude = item
            .get("altitude")
            .and_then(number)
            .ok_or_else(|| CatalogError::invalid("Bad or missing altitude for viewpoint."))?;

        let up = match str_field(item, "up") {
            Some(up) => up.parse::<UpVector>()?,
            None => UpVector::default(),
        };
        let azimuth = angle_value(item.get("azimuth"), 0.0)
            .map_err(|_| CatalogError::invalid("Bad azimuth given for viewpoint"))?;
        let elevation = angle_value(item.get("elevation"), 0.0)
            .map_err(|_| CatalogError::invalid("Bad elevation given for viewpoint."))?;

        let center = resolve_body(catalog, center_name, "Center body for viewpoint")?;
        let reference = resolve_body(catalog, reference_name, "Reference body for viewpoint")?;

        let radius = center
            .upgrade()
            .and_then(|body| {
                let axes = body.borrow().geometry().and_then(|g| g.ellipsoid());
                axes
            })
            .map_or(0.0, |axes| axes.max() / 2.0);

        Ok(Viewpoint {
            name: name.to_string(),
            center,
            reference,
            distance: altitude + radius,
            azimuth,
            elevation,
            up,
        })
    }
}

#[cfg(test)]
mod viewpoint_builder_test {
    use super::*;
    use crate::body::Body;
    use crate::geometry::{Geometry, Globe};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use serde_json::{json, Value};

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn catalog() -> UniverseCatalog {
        let mut catalog = UniverseCatalog::new();
        let mut earth = Body::new("Earth");
        earth.set_geometry(Some(Geometry::Globe(Globe::new(Vector3::new(6378.0, 6378.0, 6357.0)))));
        catalog.add_body("Earth", earth);
        catalog.add_body("Sun", Body::new("Sun"));
        catalog
    }

    #[test]
    fn test_altitude_is_offset_by_ellipsoid() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let vp = loader
            .load_viewpoint(
                &map(json!({
                    "name": "Above Earth", "center": "Earth", "reference": "Sun",
                    "altitude": 1000, "azimuth": 90, "elevation": -30, "up": "EclipticNorth"
                })),
                &catalog,
            )
            .unwrap();
        assert_relative_eq!(vp.distance, 7378.0);
        assert_relative_eq!(vp.azimuth, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(vp.elevation, -std::f64::consts::FRAC_PI_6);
        assert_eq!(vp.up, UpVector::EclipticNorth);
        assert_eq!(vp.reference.name(), "Sun");

        let plain = loader
            .load_viewpoint(
                &map(json!({ "name": "Sunward", "center": "Sun", "reference": "Earth", "altitude": 5 })),
                &catalog,
            )
            .unwrap();
        assert_relative_eq!(plain.distance, 5.0);
        assert_eq!(plain.up, UpVector::CenterNorth);
    }

    #[test]
    fn test_viewpoint_errors() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let err = |value: Value| loader.load_viewpoint(&map(value), &catalog).unwrap_err();

        assert_eq!(
            err(json!({ "name": "v", "center": "Earth", "reference": "Sun" })),
            CatalogError::invalid("Bad or missing altitude for viewpoint.")
        );
        assert_eq!(
            err(json!({ "name": "v", "center": "Pluto", "reference": "Sun", "altitude": 1 }))
                .to_string(),
            "Center body for viewpoint 'Pluto' not found"
        );
        assert_eq!(
            err(json!({ "name": "v", "center": "Earth", "reference": "Sun", "altitude": 1, "up": "Sideways" }))
                .to_string(),
            "Invalid up vector 'Sideways' for viewpoint"
        );
    }
}
