use std::fmt;
use std::str::FromStr;

use nalgebra::{Rotation3, UnitQuaternion, Vector3};

use crate::catalog_errors::CatalogError;
use crate::constants::{B1950_JD, DAYS_PER_JULIAN_CENTURY, J2000_JD, RADEG, RADSEC};

/// Non-rotating reference frames known by name.
///
/// Orientations are given relative to the J2000 mean equator and equinox (EME2000),
/// which is also the default frame of every arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InertialFrame {
    EclipticJ2000,
    EquatorJ2000,
    EquatorB1950,
    /// Treated as coincident with EquatorJ2000; the frame bias is below the catalog
    /// precision.
    Icrf,
}

impl InertialFrame {
    pub fn name(&self) -> &'static str {
        match self {
            InertialFrame::EclipticJ2000 => "EclipticJ2000",
            InertialFrame::EquatorJ2000 => "EquatorJ2000",
            InertialFrame::EquatorB1950 => "EquatorB1950",
            InertialFrame::Icrf => "ICRF",
        }
    }

    /// Rotation taking coordinates in this frame to EME2000 coordinates.
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        match self {
            InertialFrame::EquatorJ2000 | InertialFrame::Icrf => UnitQuaternion::identity(),
            InertialFrame::EclipticJ2000 => {
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), obliquity(J2000_JD))
            }
            InertialFrame::EquatorB1950 => {
                UnitQuaternion::from_rotation_matrix(&precession_to_j2000(B1950_JD))
            }
        }
    }
}

impl fmt::Display for InertialFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InertialFrame {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EclipticJ2000" => Ok(InertialFrame::EclipticJ2000),
            "EquatorJ2000" => Ok(InertialFrame::EquatorJ2000),
            "EquatorB1950" => Ok(InertialFrame::EquatorB1950),
            "ICRF" => Ok(InertialFrame::Icrf),
            other => Err(CatalogError::unknown_type("inertial frame", other)),
        }
    }
}

/// Mean obliquity of the ecliptic (IAU 1976), in radians.
///
/// Arguments
/// ---------
/// * `jd`: TDB Julian Date
///
/// The polynomial in Julian centuries T since J2000 is evaluated with Horner's scheme:
///
/// ```text
/// ε(T) = 84381.448″ − 46.815″·T − 0.0006″·T² + 0.00181″·T³
/// ```
pub fn obliquity(jd: f64) -> f64 {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// IAU 1976 precession taking mean-equator coordinates of epoch `jd` to J2000.
///
/// Built as `Rz(−ζ) · Ry(θ) · Rz(−z)` from the three precession angles.
pub fn precession_to_j2000(jd: f64) -> Rotation3<f64> {
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    Rotation3::from_axis_angle(&Vector3::z_axis(), -zeta)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), theta)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), -z)
}
