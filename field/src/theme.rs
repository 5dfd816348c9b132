use std::fmt;

use serde::de::{Deserialize, Deserializer, Error as DeError};
use serde::ser::{Serialize, Serializer};

use serde_derive::Deserialize;

#[derive(Debug)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid color `{}`, expected `#rrggbb`", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// RGB color with channels in [0, 1], written as `#rrggbb` in configs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Color, ColorParseError> {
        let digits = match hex.strip_prefix('#') {
            Some(d) if d.len() == 6 => d,
            _ => return Err(ColorParseError(hex.to_string())),
        };

        let channel = |range| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.)
                .map_err(|_| ColorParseError(hex.to_string()))
        };

        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0., 1.) * 255.).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Moves each channel a fraction `t` of the way toward `target`.
    pub fn lerp(&self, target: &Color, t: f32) -> Color {
        Color {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(D::Error::custom)
    }
}

/// Live-mutable rendering parameters, read by the simulator every tick and
/// owned by the caller. Positivity of the scalars is the caller's contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneTheme {
    pub primary_color: Color,
    pub secondary_color: Color,
    pub particle_size: f32,
    pub speed: f32,
}

impl Default for SceneTheme {
    fn default() -> SceneTheme {
        SceneTheme {
            primary_color: Color::new(1.0, 0.0, 0.4),
            secondary_color: Color::new(0.0, 1.0, 1.0),
            particle_size: 0.15,
            speed: 1.0,
        }
    }
}
