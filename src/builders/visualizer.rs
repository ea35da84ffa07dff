use serde_json::Value;

use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::loader::UniverseLoader;
use crate::values::{color_value, number, FieldMap, Spectrum};
use crate::visualizers::{Visualizer, FRAME_AXES_OPACITY};

use super::{body_field, type_field};

impl UniverseLoader {
    /// Build the visualizer described by the item's `style` map.
    pub fn load_visualizer(
        &self,
        item: &FieldMap,
        catalog: &UniverseCatalog,
    ) -> Result<Visualizer, CatalogError> {
        let style = item
            .get("style")
            .and_then(Value::as_object)
            .ok_or_else(|| CatalogError::missing("Missing visualizer style."))?;

        match type_field(style, "Bad or missing type for visualizer style.")? {
            "BodyAxes" => Ok(Visualizer::BodyAxes {
                size: visualizer_size(style, "BodyAxes")?,
            }),
            "FrameAxes" => Ok(Visualizer::FrameAxes {
                size: visualizer_size(style, "FrameAxes")?,
                opacity: FRAME_AXES_OPACITY,
            }),
            "BodyDirection" => Ok(Visualizer::BodyDirection {
                size: visualizer_size(style, "BodyDirection")?,
                target: body_field(
                    catalog,
                    style,
                    "target",
                    "Bad or missing target for BodyDirection visualizer",
                    "Target body for BodyDirection visualizer",
                )?,
                color: color_value(style.get("color"), Spectrum::white())?,
            }),
            other => Err(CatalogError::unknown_type("visualizer", other)),
        }
    }
}

fn visualizer_size(style: &FieldMap, kind: &str) -> Result<f64, CatalogError> {
    style.get("size").map_or(Ok(1.0), |v| {
        number(v).ok_or_else(|| CatalogError::invalid(format!("Bad size given for {kind} visualizer")))
    })
}

#[cfg(test)]
mod visualizer_builder_test {
    use super::*;
    use crate::body::Body;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_visualizer_styles() {
        let loader = UniverseLoader::new();
        let mut catalog = UniverseCatalog::new();
        catalog.add_body("Sun", Body::new("Sun"));

        let axes = loader
            .load_visualizer(&map(json!({ "style": { "type": "FrameAxes", "size": 2 } })), &catalog)
            .unwrap();
        assert!(matches!(axes, Visualizer::FrameAxes { opacity, .. } if opacity == FRAME_AXES_OPACITY));
        assert_eq!(axes.size(), 2.0);

        let body_axes = loader
            .load_visualizer(&map(json!({ "style": { "type": "BodyAxes" } })), &catalog)
            .unwrap();
        assert_eq!(body_axes.size(), 1.0);

        let direction = loader
            .load_visualizer(
                &map(json!({ "style": { "type": "BodyDirection", "target": "Sun", "color": "#ffff00" } })),
                &catalog,
            )
            .unwrap();
        match direction {
            Visualizer::BodyDirection { target, .. } => assert_eq!(target.name(), "Sun"),
            other => panic!("unexpected visualizer {other:?}"),
        }
    }

    #[test]
    fn test_visualizer_errors() {
        let loader = UniverseLoader::new();
        let catalog = UniverseCatalog::new();
        let err = |value: Value| loader.load_visualizer(&map(value), &catalog).unwrap_err();

        assert_eq!(err(json!({})), CatalogError::missing("Missing visualizer style."));
        assert_eq!(
            err(json!({ "style": { "type": "BodyAxes", "size": "big" } })),
            CatalogError::invalid("Bad size given for BodyAxes visualizer")
        );
        assert_eq!(
            err(json!({ "style": { "type": "Halo" } })).to_string(),
            "Unknown visualizer type 'Halo'"
        );
        assert_eq!(
            err(json!({ "style": { "type": "BodyDirection", "target": "Sun" } })).to_string(),
            "Target body for BodyDirection visualizer 'Sun' not found"
        );
    }
}
