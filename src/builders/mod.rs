//! # Catalog object builders
//!
//! Each builder turns one JSON map of a catalog document into a typed object. They are
//! `impl UniverseLoader` blocks, since many need the loader's state (builtin tables,
//! search paths, the TLE cache, the resource loader), and they look up referenced bodies
//! in the catalog being built.
//!
//! Builders dispatch on the map's string `type` and return a [`CatalogError`] naming
//! the problem; the caller decides whether the error discards the item.
//!
//! | Module          | Builds                                              |
//! |-----------------|-----------------------------------------------------|
//! | [`trajectory`]  | [`crate::trajectories::Trajectory`]                 |
//! | [`rotation`]    | [`crate::rotation_models::RotationModel`]           |
//! | [`frame`]       | [`crate::frames::Frame`] and two-vector directions  |
//! | [`arc`]         | [`crate::body::Arc`] and chronologies               |
//! | [`geometry`]    | [`crate::geometry::Geometry`]                       |
//! | [`visualizer`]  | [`crate::visualizers::Visualizer`]                  |
//! | [`viewpoint`]   | [`crate::viewpoint::Viewpoint`]                     |
//! | [`body_info`]   | [`crate::body_info::BodyInfo`]                      |

pub mod arc;
pub mod body_info;
pub mod frame;
pub mod geometry;
pub mod rotation;
pub mod trajectory;
pub mod viewpoint;
pub mod visualizer;

use crate::body::BodyRef;
use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::values::{str_field, FieldMap};

/// The `type` of a catalog map, or `message` as a missing-field error.
pub(crate) fn type_field<'a>(map: &'a FieldMap, message: &str) -> Result<&'a str, CatalogError> {
    str_field(map, "type").ok_or_else(|| CatalogError::missing(message))
}

/// Look up a named body, failing with "`kind` 'name' not found".
pub(crate) fn resolve_body(
    catalog: &UniverseCatalog,
    name: &str,
    kind: &str,
) -> Result<BodyRef, CatalogError> {
    catalog
        .find_ref(name)
        .ok_or_else(|| CatalogError::unresolved(kind, name))
}

/// A string field naming a registered body.
pub(crate) fn body_field(
    catalog: &UniverseCatalog,
    map: &FieldMap,
    key: &str,
    missing: &str,
    kind: &str,
) -> Result<BodyRef, CatalogError> {
    let name = str_field(map, key).ok_or_else(|| CatalogError::missing(missing))?;
    resolve_body(catalog, name, kind)
}
