//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **physical constants**, **unit conversion factors**, and
//! **common type aliases** used by the catalog loader, the ephemeris decoder and the
//! motion models.
//!
//! ## Overview
//!
//! - Canonical units: distances in kilometers, times in TDB seconds since J2000.0
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Default chronology bounds used when a catalog item gives no explicit time span
//! - Type aliases shared across the crate
//!
//! Catalog documents are authored in degrees, days and mixed distance units; every value
//! is converted into the canonical units defined here as soon as it is parsed.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers, as used by catalog distance strings (`"1.5au"`)
pub const AU: f64 = 149_597_870.691;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TDB)
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the B1950.0 epoch
pub const B1950_JD: f64 = 2_433_282.423_5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth gravitational parameter in km³/s² (WGS-72, the value paired with TLE mean elements)
pub const EARTH_GM: f64 = 398_600.8;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Catalog defaults
// -------------------------------------------------------------------------------------------------

/// Chronology start used when a body has no `startTime`: 1800-01-01 12:00:00 TDB
pub const DEFAULT_START_TIME: Second = -2.0 * DAYS_PER_JULIAN_CENTURY * SECONDS_PER_DAY;

/// Arc end used when an arc has no `endTime`: 2100-01-01 12:00:00 TDB
pub const DEFAULT_END_TIME: Second = DAYS_PER_JULIAN_CENTURY * SECONDS_PER_DAY;

/// Deepest allowed `require` nesting before a document is rejected
pub const MAX_REQUIRE_DEPTH: u32 = 10;

/// Bounds applied to the trajectory plot sample count of a body
pub const TRAJECTORY_PLOT_SAMPLES_RANGE: (u32, u32) = (100, 50_000);

/// Number of samples used for a trajectory plot when the catalog does not say otherwise
pub const DEFAULT_TRAJECTORY_PLOT_SAMPLES: u32 = 100;

/// Upper bound on `lifetime * spawnRate` for a single particle emitter
pub const MAX_PARTICLES_PER_EMITTER: f64 = 200_000.0;

/// Cloud layer altitude assigned to globes with a `cloudMap`, in kilometers
pub const CLOUD_ALTITUDE: Kilometer = 6.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Time in TDB seconds since J2000.0, or a duration in seconds
pub type Second = f64;
/// Julian Date (days, TDB)
pub type JulianDay = f64;
