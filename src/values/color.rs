use serde_json::Value;

use crate::catalog_errors::CatalogError;

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrum {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Spectrum {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Spectrum { red, green, blue }
    }

    pub const fn white() -> Self {
        Spectrum::new(1.0, 1.0, 1.0)
    }

    pub const fn black() -> Self {
        Spectrum::new(0.0, 0.0, 0.0)
    }

    fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Spectrum::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
        )
    }
}

impl Default for Spectrum {
    fn default() -> Self {
        Spectrum::white()
    }
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("white", (255, 255, 255)),
    ("maroon", (128, 0, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("olive", (128, 128, 0)),
    ("yellow", (255, 255, 0)),
    ("navy", (0, 0, 128)),
    ("blue", (0, 0, 255)),
    ("teal", (0, 128, 128)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("gold", (255, 215, 0)),
    ("skyblue", (135, 206, 235)),
    ("lightgray", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
];

fn hex_digit_pair(text: &str) -> Option<u8> {
    u8::from_str_radix(text, 16).ok()
}

/// Parse a named (`"orange"`) or hexadecimal (`"#f80"`, `"#ff8800"`) color string.
///
/// Arguments
/// ---------
/// * `text`: the color string, case-insensitive
///
/// Return
/// ------
/// * the parsed color or [`CatalogError::InvalidColor`]
pub fn parse_color_string(text: &str) -> Result<Spectrum, CatalogError> {
    let invalid = || CatalogError::InvalidColor(text.to_string());
    let trimmed = text.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        return match hex.len() {
            3 => {
                // "#f80" expands each digit to a doubled pair: "#ff8800"
                let expand = |i: usize| hex_digit_pair(&hex[i..=i].repeat(2)).ok_or_else(invalid);
                Ok(Spectrum::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => {
                let pair = |i: usize| hex_digit_pair(&hex[i..i + 2]).ok_or_else(invalid);
                Ok(Spectrum::from_rgb8(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(invalid()),
        };
    }

    let lower = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, (r, g, b))| Spectrum::from_rgb8(*r, *g, *b))
        .ok_or_else(invalid)
}

/// Parse a color field: either a 3-element numeric array or a color string.
pub fn parse_color(value: &Value) -> Result<Spectrum, CatalogError> {
    match value {
        Value::String(s) => parse_color_string(s),
        Value::Array(_) => {
            let v = super::vec3_value(value)?;
            Ok(Spectrum::new(v.x as f32, v.y as f32, v.z as f32))
        }
        other => Err(CatalogError::InvalidColor(other.to_string())),
    }
}
