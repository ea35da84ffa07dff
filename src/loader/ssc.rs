//! # Legacy `.ssc` solar system catalogs
//!
//! An SSC file is a list of objects:
//!
//! ```text
//! # comment
//! [Add|Modify|Replace] [Body|ReferencePoint|SurfaceObject] "Name[:Alias…]" "Parent/Path"
//! {
//!     Key value
//!     Group { Key value … }
//! }
//! ```
//!
//! where a value is a number, a quoted string, `true`/`false`, a `[ … ]` list of values
//! or a `{ … }` group. [`parse_ssc`] reads the objects, and [`transform_ssc_object`]
//! rewrites each one as a native catalog item so that it goes through the same builders
//! as JSON catalogs.
//!
//! Orbit units follow the parent: objects orbiting a top-level parent (a star) give
//! distances in AU and periods in years, all others in km and days.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{char, multispace1, not_line_ending},
    combinator::{map, opt, value},
    multi::{fold_many0, many0},
    number::complete::double,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use serde_json::Value;

use crate::catalog_errors::CatalogError;
use crate::constants::{AU, DAYS_PER_JULIAN_YEAR};
use crate::values::{number, FieldMap};

/// How an object combines with a body of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SscDisposition {
    #[default]
    Add,
    Modify,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SscKind {
    Body,
    ReferencePoint,
    SurfaceObject,
    /// Object kinds the catalog has no use for (`Location`, `AltSurface`, …)
    Other(String),
}

impl SscKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "Body" => SscKind::Body,
            "ReferencePoint" => SscKind::ReferencePoint,
            "SurfaceObject" => SscKind::SurfaceObject,
            other => SscKind::Other(other.to_string()),
        }
    }

    /// Whether objects of this kind become catalog bodies.
    pub fn is_body(&self) -> bool {
        !matches!(self, SscKind::Other(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SscObject {
    pub disposition: SscDisposition,
    pub kind: SscKind,
    /// Primary name; aliases after the first `:` are dropped
    pub name: String,
    /// Path of the parent body, e.g. `Sol/Earth`
    pub parent: String,
    pub properties: FieldMap,
}

type ParseResult<'a, O> = IResult<&'a str, O>;

/// Whitespace and `#` comments.
fn skip(input: &str) -> ParseResult<()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char('#'), not_line_ending)),
        ))),
    )(input)
}

fn quoted(input: &str) -> ParseResult<String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((
                    value("\\", tag("\\")),
                    value("\"", tag("\"")),
                    value("\n", tag("n")),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

fn identifier(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn boolean(input: &str) -> ParseResult<bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

fn property_value(input: &str) -> ParseResult<Value> {
    preceded(
        skip,
        alt((
            map(quoted, Value::String),
            map(boolean, Value::Bool),
            map(double, Value::from),
            map(array, Value::Array),
            map(group, Value::Object),
        )),
    )(input)
}

fn array(input: &str) -> ParseResult<Vec<Value>> {
    delimited(
        char('['),
        many0(property_value),
        preceded(skip, char(']')),
    )(input)
}

/// `{ Key value … }`; a repeated key keeps its last value.
fn group(input: &str) -> ParseResult<FieldMap> {
    delimited(
        char('{'),
        fold_many0(
            pair(preceded(skip, identifier), property_value),
            FieldMap::new,
            |mut map, (key, value)| {
                map.insert(key.to_string(), value);
                map
            },
        ),
        preceded(skip, char('}')),
    )(input)
}

fn disposition(input: &str) -> ParseResult<SscDisposition> {
    alt((
        value(SscDisposition::Add, tag("Add")),
        value(SscDisposition::Modify, tag("Modify")),
        value(SscDisposition::Replace, tag("Replace")),
    ))(input)
}

fn ssc_object(input: &str) -> ParseResult<SscObject> {
    map(
        tuple((
            opt(preceded(skip, disposition)),
            opt(preceded(skip, identifier)),
            preceded(skip, quoted),
            preceded(skip, quoted),
            preceded(skip, group),
        )),
        |(disposition, kind, names, parent, properties)| SscObject {
            disposition: disposition.unwrap_or_default(),
            kind: kind.map_or(SscKind::Body, SscKind::from_keyword),
            name: names.split(':').next().unwrap_or_default().to_string(),
            parent,
            properties,
        },
    )(input)
}

fn syntax_error(text: &str, rest: &str, file: &str) -> CatalogError {
    let offset = text.len() - rest.len();
    let line = text[..offset].matches('\n').count() + 1;
    let near: String = rest.lines().next().unwrap_or_default().chars().take(32).collect();
    CatalogError::DocumentSyntax {
        file: file.to_string(),
        line,
        message: if near.is_empty() {
            "unexpected end of file".to_string()
        } else {
            format!("syntax error near '{near}'")
        },
    }
}

/// Parse the text of an SSC file.
///
/// Return
/// ----------
/// * every object in file order, or a [`CatalogError::DocumentSyntax`] locating the
///   first object that could not be read
pub fn parse_ssc(text: &str, file: &str) -> Result<Vec<SscObject>, CatalogError> {
    let mut objects = Vec::new();
    let mut rest = text;

    loop {
        rest = match skip(rest) {
            Ok((after, ())) => after,
            Err(_) => rest,
        };
        if rest.is_empty() {
            return Ok(objects);
        }

        match ssc_object(rest) {
            Ok((after, object)) => {
                objects.push(object);
                rest = after;
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(syntax_error(text, e.input, file));
            }
            Err(nom::Err::Incomplete(_)) => return Err(syntax_error(text, "", file)),
        }
    }
}

/// Units of orbital elements around a parent.
struct OrbitUnits {
    /// Kilometers per distance unit
    distance: f64,
    /// Days per period unit
    period: f64,
}

impl OrbitUnits {
    fn for_parent(parent: &str) -> Self {
        if parent.contains('/') {
            OrbitUnits {
                distance: 1.0,
                period: 1.0,
            }
        } else {
            OrbitUnits {
                distance: AU,
                period: DAYS_PER_JULIAN_YEAR,
            }
        }
    }
}

fn num(map: &FieldMap, key: &str) -> Option<f64> {
    map.get(key).and_then(number)
}

fn insert_num(map: &mut FieldMap, key: &str, v: f64) {
    map.insert(key.to_string(), Value::from(v));
}

fn elliptical_orbit(orbit: &FieldMap, units: &OrbitUnits) -> FieldMap {
    let mut traj = FieldMap::new();
    traj.insert("type".into(), "Keplerian".into());

    let eccentricity = num(orbit, "Eccentricity").unwrap_or(0.0);
    let semi_major_axis = num(orbit, "SemiMajorAxis").or_else(|| {
        num(orbit, "PericenterDistance").map(|q| q / (1.0 - eccentricity))
    });
    if let Some(a) = semi_major_axis {
        insert_num(&mut traj, "semiMajorAxis", a * units.distance);
    }
    if let Some(period) = num(orbit, "Period") {
        insert_num(&mut traj, "period", period * units.period);
    }
    insert_num(&mut traj, "eccentricity", eccentricity);

    let inclination = num(orbit, "Inclination").unwrap_or(0.0);
    let node = num(orbit, "AscendingNode").unwrap_or(0.0);
    let long_of_pericenter = num(orbit, "LongOfPericenter");
    let arg_of_pericenter = num(orbit, "ArgOfPericenter")
        .or_else(|| long_of_pericenter.map(|lp| lp - node))
        .unwrap_or(0.0);
    let long_of_pericenter = long_of_pericenter.unwrap_or(arg_of_pericenter + node);
    let mean_anomaly = num(orbit, "MeanAnomaly")
        .or_else(|| num(orbit, "MeanLongitude").map(|ml| ml - long_of_pericenter))
        .unwrap_or(0.0);

    insert_num(&mut traj, "inclination", inclination);
    insert_num(&mut traj, "ascendingNode", node);
    insert_num(&mut traj, "argumentOfPeriapsis", arg_of_pericenter);
    insert_num(&mut traj, "meanAnomaly", mean_anomaly);
    if let Some(epoch) = orbit.get("Epoch") {
        traj.insert("epoch".into(), epoch.clone());
    }
    traj
}

fn trajectory(props: &FieldMap, units: &OrbitUnits) -> Option<FieldMap> {
    if let Some(Value::Object(orbit)) = props.get("EllipticalOrbit") {
        return Some(elliptical_orbit(orbit, units));
    }

    let mut traj = FieldMap::new();
    if let Some(Value::Array(position)) = props.get("FixedPosition") {
        traj.insert("type".into(), "FixedPoint".into());
        let scaled = position
            .iter()
            .map(|v| number(v).map_or(Value::Null, |x| Value::from(x * units.distance)))
            .collect();
        traj.insert("position".into(), Value::Array(scaled));
    } else if let Some(Value::String(name)) = props.get("CustomOrbit") {
        traj.insert("type".into(), "Builtin".into());
        traj.insert("name".into(), name.as_str().into());
    } else if let Some(source) = sampled_source(props, "SampledTrajectory", "SampledOrbit") {
        traj.insert("type".into(), "InterpolatedStates".into());
        traj.insert("source".into(), source.into());
    } else {
        return None;
    }
    Some(traj)
}

/// `Group { Source "file" }` or the older `Legacy "file"` form.
fn sampled_source<'a>(props: &'a FieldMap, group: &str, legacy: &str) -> Option<&'a str> {
    match props.get(group) {
        Some(Value::Object(map)) => map.get("Source").and_then(Value::as_str),
        _ => props.get(legacy).and_then(Value::as_str),
    }
}

fn rotation_model(props: &FieldMap) -> Option<FieldMap> {
    let mut rot = FieldMap::new();

    let copy_angles = |rot: &mut FieldMap, src: &FieldMap, keys: [(&str, &str); 3]| {
        for (from, to) in keys {
            if let Some(v) = num(src, from) {
                insert_num(rot, to, v);
            }
        }
    };

    if let Some(Value::Object(uniform)) = props.get("UniformRotation") {
        rot.insert("type".into(), "Uniform".into());
        if let Some(hours) = num(uniform, "Period") {
            insert_num(&mut rot, "period", hours / 24.0);
        }
        copy_angles(
            &mut rot,
            uniform,
            [
                ("Inclination", "inclination"),
                ("AscendingNode", "ascendingNode"),
                ("MeridianAngle", "meridianAngle"),
            ],
        );
        if let Some(epoch) = uniform.get("Epoch") {
            rot.insert("epoch".into(), epoch.clone());
        }
    } else if let Some(Value::Object(fixed)) = props.get("FixedRotation") {
        rot.insert("type".into(), "Fixed".into());
        copy_angles(
            &mut rot,
            fixed,
            [
                ("Inclination", "inclination"),
                ("AscendingNode", "ascendingNode"),
                ("MeridianAngle", "meridianAngle"),
            ],
        );
    } else if let Some(source) = sampled_source(props, "SampledOrientation", "Orientation") {
        rot.insert("type".into(), "Interpolated".into());
        rot.insert("source".into(), source.into());
        rot.insert("compatibility".into(), "celestia".into());
    } else if let Some(hours) = num(props, "RotationPeriod") {
        rot.insert("type".into(), "Uniform".into());
        insert_num(&mut rot, "period", hours / 24.0);
        copy_angles(
            &mut rot,
            props,
            [
                ("Obliquity", "inclination"),
                ("EquatorAscendingNode", "ascendingNode"),
                ("RotationOffset", "meridianAngle"),
            ],
        );
        if let Some(epoch) = props.get("RotationEpoch") {
            rot.insert("epoch".into(), epoch.clone());
        }
    } else {
        return None;
    }
    Some(rot)
}

fn geometry(props: &FieldMap) -> Option<FieldMap> {
    let radius = num(props, "Radius");
    let mut geom = FieldMap::new();

    if let Some(mesh) = props.get("Mesh").and_then(Value::as_str) {
        geom.insert("type".into(), "Mesh".into());
        geom.insert("source".into(), mesh.into());
        insert_num(&mut geom, "size", radius.unwrap_or(1.0));
        return Some(geom);
    }

    if radius.is_none() && !props.contains_key("Texture") {
        return None;
    }
    geom.insert("type".into(), "Globe".into());
    insert_num(&mut geom, "radius", radius.unwrap_or(1.0));
    for (from, to) in [("Texture", "baseMap"), ("NormalMap", "normalMap"), ("CloudMap", "cloudMap")] {
        if let Some(name) = props.get(from).and_then(Value::as_str) {
            geom.insert(to.into(), name.into());
        }
    }
    if let Some(emissive) = props.get("Emissive").and_then(Value::as_bool) {
        geom.insert("emissive".into(), emissive.into());
    }
    if let Some(Value::Object(rings)) = props.get("Rings") {
        let mut ring_system = FieldMap::new();
        for (from, to) in [("Inner", "innerRadius"), ("Outer", "outerRadius"), ("Texture", "texture")] {
            if let Some(v) = rings.get(from) {
                ring_system.insert(to.into(), v.clone());
            }
        }
        geom.insert("ringSystem".into(), Value::Object(ring_system));
    }
    Some(geom)
}

/// Rewrite an SSC object as a native body item named `Parent/Path/Name` and centered
/// on its parent.
pub fn transform_ssc_object(object: &SscObject) -> FieldMap {
    let props = &object.properties;
    let units = OrbitUnits::for_parent(&object.parent);
    let mut item = FieldMap::new();

    item.insert("type".into(), "body".into());
    item.insert("name".into(), format!("{}/{}", object.parent, object.name).into());
    item.insert("center".into(), object.parent.as_str().into());
    item.insert("trajectoryFrame".into(), "EclipticJ2000".into());
    item.insert("bodyFrame".into(), "EclipticJ2000".into());

    if let Some(geom) = geometry(props) {
        item.insert("geometry".into(), Value::Object(geom));
    }
    if let Some(traj) = trajectory(props, &units) {
        item.insert("trajectory".into(), Value::Object(traj));
    }
    if let Some(rot) = rotation_model(props) {
        item.insert("rotationModel".into(), Value::Object(rot));
    }

    for (from, to) in [
        ("Class", "class"),
        ("Visible", "visible"),
        ("Beginning", "startTime"),
        ("Ending", "endTime"),
    ] {
        if let Some(v) = props.get(from) {
            item.insert(to.into(), v.clone());
        }
    }

    item
}
