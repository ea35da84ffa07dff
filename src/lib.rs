pub mod body;
pub mod body_info;
pub mod builders;
pub mod catalog;
pub mod catalog_errors;
pub mod constants;
pub mod frames;
pub mod geometry;
pub mod jpl_ephem;
pub mod loader;
pub mod resources;
pub mod rotation_models;
pub mod time;
pub mod trajectories;
pub mod values;
pub mod viewpoint;
pub mod visualizers;

pub use body::{absolute_position, Arc, Body, BodyHandle, BodyRef, Chronology};
pub use catalog::UniverseCatalog;
pub use catalog_errors::CatalogError;
pub use loader::{LoaderConfig, UniverseLoader};
