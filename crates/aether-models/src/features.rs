//! Per-image visual features.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{ColorHarmony, ColorTemperature, WeightedColor};

/// Visual features of a single image.
///
/// Produced by the extractor and consumed by the mood classifier and the
/// collection aggregator. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageFeatures {
    /// Most prevalent colors first. Non-empty for any successfully read image.
    pub dominant_colors: Vec<WeightedColor>,
    pub temperature: ColorTemperature,
    /// Hue relationship between the dominant colors.
    pub color_harmony: ColorHarmony,
    /// Mean pairwise RGB distance of the dominant colors, normalized to `[0, 1]`.
    pub color_diversity: f32,
    /// Mean HSV saturation, `[0, 1]`.
    pub saturation: f32,
    /// Mean perceptual brightness, `[0, 1]`.
    pub brightness: f32,
    /// Normalized brightness spread, `[0, 1]`.
    pub contrast: f32,
    /// Weighted edge density and texture, `[0, 1]`.
    pub complexity: f32,
    /// Normalized edge density component of `complexity`.
    pub edge_density: f32,
    /// Normalized texture variance component of `complexity`.
    pub texture: f32,
    /// Original width in pixels.
    pub width: u32,
    /// Original height in pixels.
    pub height: u32,
    pub aspect_ratio: f32,
    /// Container format (`"PNG"`, `"JPEG"`, ...) when decoded from encoded bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ImageFeatures {
    /// The single most prevalent color, if any.
    pub fn dominant_color(&self) -> Option<&WeightedColor> {
        self.dominant_colors.first()
    }

    pub fn is_landscape(&self) -> bool {
        self.aspect_ratio > 1.0
    }

    /// Original resolution in megapixels, rounded to two decimals.
    pub fn megapixels(&self) -> f32 {
        let megapixels = f64::from(self.width) * f64::from(self.height) / 1_000_000.0;
        ((megapixels * 100.0).round() / 100.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn features(width: u32, height: u32) -> ImageFeatures {
        ImageFeatures {
            dominant_colors: vec![WeightedColor::new(Rgb::WHITE, 1.0)],
            temperature: ColorTemperature::Neutral,
            color_harmony: ColorHarmony::Monochromatic,
            color_diversity: 0.0,
            saturation: 0.0,
            brightness: 1.0,
            contrast: 0.0,
            complexity: 0.0,
            edge_density: 0.0,
            texture: 0.0,
            width,
            height,
            aspect_ratio: width as f32 / height as f32,
            format: None,
        }
    }

    #[test]
    fn test_megapixels_rounds_to_two_decimals() {
        assert_eq!(features(1920, 1080).megapixels(), 2.07);
        assert_eq!(features(4000, 3000).megapixels(), 12.0);
        assert_eq!(features(10, 10).megapixels(), 0.0);
    }

    #[test]
    fn test_format_omitted_when_unknown() {
        let json = serde_json::to_value(features(2, 1)).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json["color_harmony"], "monochromatic");

        let mut png = features(2, 1);
        png.format = Some("PNG".to_string());
        assert_eq!(serde_json::to_value(png).unwrap()["format"], "PNG");
    }
}
