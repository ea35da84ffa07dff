use std::rc::Rc;

use crate::catalog_errors::CatalogError;
use crate::loader::UniverseLoader;
use crate::rotation_models::interpolated::{load_interpolated_rotation, RotationConvention};
use crate::rotation_models::{pole_orientation, RotationModel, UniformRotation};
use crate::values::{angle_value, date_value, duration, quaternion_value, str_field, FieldMap, TimeUnit};

use super::type_field;

impl UniverseLoader {
    pub fn load_rotation_model(&self, map: &FieldMap) -> Result<RotationModel, CatalogError> {
        match type_field(map, "RotationModel definition is missing type.")? {
            "Fixed" => load_fixed_rotation(map),
            "Uniform" => load_uniform_rotation(map),
            "Builtin" => {
                let name = str_field(map, "name").ok_or_else(|| {
                    CatalogError::missing("Builtin rotation model is missing name.")
                })?;
                let model = self
                    .builtin_rotation(name)
                    .ok_or_else(|| CatalogError::unresolved("Builtin rotation model", name))?;
                Ok(RotationModel::Builtin {
                    name: name.to_string(),
                    model,
                })
            }
            "Interpolated" => self.load_interpolated_rotation(map),
            other => Err(CatalogError::unknown_type("rotation model", other)),
        }
    }

    /// Samples from a `.q` file; `compatibility: "celestia"` converts them from the
    /// legacy axis conventions.
    fn load_interpolated_rotation(&self, map: &FieldMap) -> Result<RotationModel, CatalogError> {
        let source = str_field(map, "source").ok_or_else(|| {
            CatalogError::missing("No source file specified for interpolated rotation.")
        })?;
        if !source.to_ascii_lowercase().ends_with(".q") {
            return Err(CatalogError::invalid("Unknown interpolated rotation format."));
        }

        let convention = match str_field(map, "compatibility") {
            Some("celestia") => RotationConvention::Celestia,
            _ => RotationConvention::Standard,
        };
        let rotation = load_interpolated_rotation(&self.data_file_name(source), convention)?;
        Ok(RotationModel::Interpolated(Rc::new(rotation)))
    }
}

/// Either an explicit `quaternion` or the three pole angles.
fn load_fixed_rotation(map: &FieldMap) -> Result<RotationModel, CatalogError> {
    if let Some(value) = map.get("quaternion") {
        return quaternion_value(value)
            .map(RotationModel::Fixed)
            .map_err(|_| CatalogError::invalid("Invalid quaternion given for FixedRotation"));
    }

    let q = pole_orientation(
        angle_value(map.get("inclination"), 0.0)?,
        angle_value(map.get("ascendingNode"), 0.0)?,
        angle_value(map.get("meridianAngle"), 0.0)?,
    );
    Ok(RotationModel::Fixed(q))
}

/// A negative period spins the body retrograde.
fn load_uniform_rotation(map: &FieldMap) -> Result<RotationModel, CatalogError> {
    let period = map
        .get("period")
        .map(|v| duration(v, TimeUnit::Day))
        .and_then(Result::ok)
        .filter(|p| p.is_finite() && *p != 0.0)
        .ok_or_else(|| CatalogError::invalid("Missing or invalid period for Uniform rotation."))?;
    let epoch = map.get("epoch").map(date_value).transpose()?.unwrap_or(0.0);

    Ok(RotationModel::Uniform(UniformRotation::from_period(
        angle_value(map.get("inclination"), 0.0)?,
        angle_value(map.get("ascendingNode"), 0.0)?,
        angle_value(map.get("meridianAngle"), 0.0)?,
        period,
        epoch,
    )))
}
