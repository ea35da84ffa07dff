//! Named camera placements.

use std::fmt;
use std::str::FromStr;

use crate::body::BodyRef;
use crate::catalog_errors::CatalogError;
use crate::constants::{Kilometer, Radian};

/// Direction shown as "up" from a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpVector {
    #[default]
    CenterNorth,
    CenterSouth,
    EclipticNorth,
    EclipticSouth,
}

impl FromStr for UpVector {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CenterNorth" => Ok(UpVector::CenterNorth),
            "CenterSouth" => Ok(UpVector::CenterSouth),
            "EclipticNorth" => Ok(UpVector::EclipticNorth),
            "EclipticSouth" => Ok(UpVector::EclipticSouth),
            other => Err(CatalogError::invalid(format!(
                "Invalid up vector '{other}' for viewpoint"
            ))),
        }
    }
}

impl fmt::Display for UpVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpVector::CenterNorth => "CenterNorth",
            UpVector::CenterSouth => "CenterSouth",
            UpVector::EclipticNorth => "EclipticNorth",
            UpVector::EclipticSouth => "EclipticSouth",
        };
        f.write_str(name)
    }
}

/// Camera looking at `center`, placed `distance` km away in the frame of `reference`.
#[derive(Debug, Clone)]
pub struct Viewpoint {
    pub name: String,
    pub center: BodyRef,
    pub reference: BodyRef,
    /// From the center of `center`, not from its surface
    pub distance: Kilometer,
    pub azimuth: Radian,
    pub elevation: Radian,
    pub up: UpVector,
}
