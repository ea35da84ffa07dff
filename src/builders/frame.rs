use std::rc::Rc;

use serde_json::Value;

use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::frames::{Axis, Direction, Frame, FrameRef, InertialFrame, TwoVectorFrame};
use crate::loader::UniverseLoader;
use crate::values::{str_field, vec3_value, FieldMap};

use super::{body_field, type_field};

impl UniverseLoader {
    /// A frame given either by an inertial frame name or by a frame map.
    pub fn load_frame_value(
        &self,
        value: &Value,
        catalog: &UniverseCatalog,
    ) -> Result<FrameRef, CatalogError> {
        match value {
            Value::String(name) => Ok(Rc::new(Frame::Inertial(name.parse()?))),
            Value::Object(map) => self.load_frame(map, catalog),
            other => Err(CatalogError::invalid(format!("Invalid frame definition {other}"))),
        }
    }

    pub fn load_frame(
        &self,
        map: &FieldMap,
        catalog: &UniverseCatalog,
    ) -> Result<FrameRef, CatalogError> {
        let frame = match type_field(map, "Frame definition is missing type.")? {
            "BodyFixed" => Frame::BodyFixed(body_field(
                catalog,
                map,
                "body",
                "BodyFixed frame is missing body name.",
                "BodyFixed frame body",
            )?),
            "TwoVector" => Frame::TwoVector(self.load_two_vector_frame(map, catalog)?),
            "Inertial" => {
                let name = str_field(map, "name")
                    .ok_or_else(|| CatalogError::missing("Inertial frame is missing name."))?;
                Frame::Inertial(name.parse()?)
            }
            other => match other.parse::<InertialFrame>() {
                Ok(inertial) => Frame::Inertial(inertial),
                Err(_) => return Err(CatalogError::unknown_type("frame", other)),
            },
        };
        Ok(Rc::new(frame))
    }

    fn load_two_vector_frame(
        &self,
        map: &FieldMap,
        catalog: &UniverseCatalog,
    ) -> Result<TwoVectorFrame, CatalogError> {
        let primary = map.get("primary").and_then(Value::as_object).ok_or_else(|| {
            CatalogError::missing("Invalid or missing primary direction in TwoVector frame")
        })?;
        let secondary = map.get("secondary").and_then(Value::as_object).ok_or_else(|| {
            CatalogError::missing("Invalid or missing secondary direction in TwoVector frame")
        })?;
        let primary_axis = axis_field(map, "primaryAxis", "primary")?;
        let secondary_axis = axis_field(map, "secondaryAxis", "secondary")?;

        TwoVectorFrame::new(
            self.load_direction(primary, catalog)?,
            primary_axis,
            self.load_direction(secondary, catalog)?,
            secondary_axis,
        )
    }

    pub fn load_direction(
        &self,
        map: &FieldMap,
        catalog: &UniverseCatalog,
    ) -> Result<Direction, CatalogError> {
        let kind = type_field(map, "Bad or missing type for TwoVector frame direction.")?;
        let relative_bodies = || {
            let observer = body_field(
                catalog,
                map,
                "observer",
                &format!("Bad or missing observer for {kind} direction"),
                &format!("Observer body for {kind} direction"),
            )?;
            let target = body_field(
                catalog,
                map,
                "target",
                &format!("Bad or missing target for {kind} direction"),
                &format!("Target body for {kind} direction"),
            )?;
            Ok::<_, CatalogError>((observer, target))
        };

        match kind {
            "RelativePosition" => {
                let (observer, target) = relative_bodies()?;
                Ok(Direction::RelativePosition { observer, target })
            }
            "RelativeVelocity" => {
                let (observer, target) = relative_bodies()?;
                Ok(Direction::RelativeVelocity { observer, target })
            }
            "ConstantVector" => {
                let direction = map
                    .get("direction")
                    .ok_or_else(|| CatalogError::missing("Direction missing for ConstantVector"))?;
                let direction = vec3_value(direction).map_err(|_| {
                    CatalogError::invalid("Invalid vector given for ConstantVector direction")
                })?;
                let frame = match map.get("frame") {
                    Some(value) => self.load_frame_value(value, catalog)?,
                    None => Frame::default_frame(),
                };
                Direction::constant(direction, frame)
            }
            other => Err(CatalogError::unknown_type("TwoVector frame direction", other)),
        }
    }
}

fn axis_field(map: &FieldMap, key: &str, which: &str) -> Result<Axis, CatalogError> {
    let label = str_field(map, key).ok_or_else(|| {
        CatalogError::missing(format!("Invalid or missing {which} axis in TwoVector frame"))
    })?;
    label.parse().map_err(|_| {
        CatalogError::invalid(format!(
            "Invalid label '{label}' for {which} axis in TwoVector frame"
        ))
    })
}

#[cfg(test)]
mod frame_builder_test {
    use super::*;
    use crate::body::Body;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn catalog() -> UniverseCatalog {
        let mut catalog = UniverseCatalog::new();
        catalog.add_body("Sun", Body::new("Sun"));
        catalog.add_body("Earth", Body::new("Earth"));
        catalog
    }

    #[test]
    fn test_inertial_names() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let frame = loader.load_frame_value(&json!("EclipticJ2000"), &catalog).unwrap();
        assert!(matches!(*frame, Frame::Inertial(InertialFrame::EclipticJ2000)));

        let frame = loader
            .load_frame_value(&json!({ "type": "Inertial", "name": "ICRF" }), &catalog)
            .unwrap();
        assert!(matches!(*frame, Frame::Inertial(InertialFrame::Icrf)));

        assert!(loader.load_frame_value(&json!("Galactic"), &catalog).is_err());
        assert_eq!(
            loader
                .load_frame(&map(json!({ "type": "Wobbly" })), &catalog)
                .unwrap_err(),
            CatalogError::unknown_type("frame", "Wobbly")
        );
    }

    #[test]
    fn test_body_fixed_needs_registered_body() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let frame = loader
            .load_frame(&map(json!({ "type": "BodyFixed", "body": "Earth" })), &catalog)
            .unwrap();
        match &*frame {
            Frame::BodyFixed(body) => assert_eq!(body.name(), "Earth"),
            other => panic!("unexpected frame {other:?}"),
        }
        assert!(loader
            .load_frame(&map(json!({ "type": "BodyFixed", "body": "Vulcan" })), &catalog)
            .is_err());
    }

    #[test]
    fn test_two_vector_axes() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let two_vector = |primary_axis: &str, secondary_axis: &str| {
            json!({
                "type": "TwoVector",
                "primary": { "type": "RelativePosition", "observer": "Earth", "target": "Sun" },
                "primaryAxis": primary_axis,
                "secondary": { "type": "ConstantVector", "direction": [0, 0, 1], "frame": "EquatorJ2000" },
                "secondaryAxis": secondary_axis
            })
        };

        let frame = loader.load_frame(&map(two_vector("x", "Z")), &catalog).unwrap();
        match &*frame {
            Frame::TwoVector(tv) => {
                assert_eq!(tv.primary_axis(), Axis::PositiveX);
                assert_eq!(tv.secondary_axis(), Axis::PositiveZ);
                assert_eq!(tv.primary().kind(), "RelativePosition");
            }
            other => panic!("unexpected frame {other:?}"),
        }

        assert!(loader.load_frame(&map(two_vector("+x", "-x")), &catalog).is_err());
        assert_eq!(
            loader.load_frame(&map(two_vector("w", "y")), &catalog).unwrap_err(),
            CatalogError::invalid("Invalid label 'w' for primary axis in TwoVector frame")
        );
    }

    #[test]
    fn test_constant_vector_rejects_zero() {
        let loader = UniverseLoader::new();
        let catalog = catalog();
        let zero = map(json!({ "type": "ConstantVector", "direction": [0, 0, 0] }));
        assert!(loader.load_direction(&zero, &catalog).is_err());

        let missing_target = map(json!({ "type": "RelativeVelocity", "observer": "Earth" }));
        assert_eq!(
            loader.load_direction(&missing_target, &catalog).unwrap_err(),
            CatalogError::missing("Bad or missing target for RelativeVelocity direction")
        );
    }
}
