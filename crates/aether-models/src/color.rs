//! Color primitives shared by the extractor, the aggregator and the theme rules.
//!
//! `Rgb` travels over the wire and into the theme cache as a `#rrggbb`
//! string, so display clients never deal with channel triples.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV representation of a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f32,
    /// Saturation, `[0, 1]`.
    pub saturation: f32,
    /// Value, `[0, 1]`.
    pub value: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Rgb) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Perceptual luma in `[0, 1]`.
    pub fn luma(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Red minus blue, the warm/cool axis used for temperature.
    pub fn warmth(self) -> f32 {
        self.r as f32 - self.b as f32
    }

    pub fn to_hsv(self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        Hsv {
            hue: hue % 360.0,
            saturation: if max == 0.0 { 0.0 } else { delta / max },
            value: max,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl JsonSchema for Rgb {
    fn schema_name() -> String {
        "Rgb".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}

#[derive(Debug, Error)]
#[error("Invalid hex color: {0}")]
pub struct ColorParseError(String);

/// A color together with the share of an image's pixels it represents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightedColor {
    pub color: Rgb,
    /// Fraction of the analysed pixels, `[0, 1]`.
    pub weight: f32,
}

impl WeightedColor {
    pub fn new(color: Rgb, weight: f32) -> Self {
        Self { color, weight }
    }
}

/// Overall color temperature of an image or collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorTemperature {
    Warm,
    Cool,
    #[default]
    Neutral,
}

impl ColorTemperature {
    pub const ALL: &'static [ColorTemperature] = &[
        ColorTemperature::Warm,
        ColorTemperature::Cool,
        ColorTemperature::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTemperature::Warm => "warm",
            ColorTemperature::Cool => "cool",
            ColorTemperature::Neutral => "neutral",
        }
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship between the hues of an image's palette, judged by the mean
/// pairwise hue distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorHarmony {
    #[default]
    Monochromatic,
    Analogous,
    Triadic,
    Complementary,
}

impl ColorHarmony {
    /// Bucket a mean pairwise hue distance in degrees (`0..=180`).
    pub fn from_mean_hue_distance(degrees: f32) -> Self {
        if degrees < 30.0 {
            ColorHarmony::Monochromatic
        } else if degrees < 60.0 {
            ColorHarmony::Analogous
        } else if degrees < 120.0 {
            ColorHarmony::Triadic
        } else {
            ColorHarmony::Complementary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorHarmony::Monochromatic => "monochromatic",
            ColorHarmony::Analogous => "analogous",
            ColorHarmony::Triadic => "triadic",
            ColorHarmony::Complementary => "complementary",
        }
    }
}

impl fmt::Display for ColorHarmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_accepts_mixed_case() {
        assert_eq!(Rgb::from_hex("#FF00ff").unwrap(), Rgb::new(255, 0, 255));
        assert_eq!(Rgb::from_hex("9932cc").unwrap(), Rgb::new(0x99, 0x32, 0xcc));
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(Rgb::new(0xDA, 0x70, 0xD6).to_hex(), "#da70d6");
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(0, 255, 255)).unwrap();
        assert_eq!(json, "\"#00ffff\"");

        let back: Rgb = serde_json::from_str("\"#00FFFF\"").unwrap();
        assert_eq!(back, Rgb::new(0, 255, 255));
        assert!(serde_json::from_str::<Rgb>("\"cyan\"").is_err());
    }

    #[test]
    fn test_hsv_primaries() {
        let magenta = Rgb::new(255, 0, 255).to_hsv();
        assert!((magenta.hue - 300.0).abs() < 0.01);
        assert!((magenta.saturation - 1.0).abs() < 0.01);

        let cyan = Rgb::new(0, 255, 255).to_hsv();
        assert!((cyan.hue - 180.0).abs() < 0.01);

        let grey = Rgb::new(128, 128, 128).to_hsv();
        assert_eq!(grey.saturation, 0.0);
        assert_eq!(grey.hue, 0.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Rgb::new(0, 0, 0).distance(Rgb::new(0, 0, 0)), 0.0);
        assert!((Rgb::new(0, 0, 0).distance(Rgb::new(30, 40, 0)) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_harmony_buckets() {
        assert_eq!(ColorHarmony::from_mean_hue_distance(0.0), ColorHarmony::Monochromatic);
        assert_eq!(ColorHarmony::from_mean_hue_distance(45.0), ColorHarmony::Analogous);
        assert_eq!(ColorHarmony::from_mean_hue_distance(60.0), ColorHarmony::Triadic);
        assert_eq!(ColorHarmony::from_mean_hue_distance(180.0), ColorHarmony::Complementary);
        assert_eq!(serde_json::to_string(&ColorHarmony::Triadic).unwrap(), "\"triadic\"");
    }
}
