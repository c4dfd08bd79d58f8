//! Theme definitions and the durable theme profile.
//!
//! A collection is classified into one of a handful of aesthetic themes:
//!
//! - `Cyberfemme`: saturated magentas, violets and cyans with intense moods
//! - `Organic`: earth tones with calm moods
//! - `Tech`: cool, high-contrast, dramatic imagery
//! - `Vintage`: warm, muted, mid-brightness imagery
//! - `Neutral`: nothing matched with enough evidence

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::color::{ColorTemperature, Rgb};
use crate::mood::{EnergyLevel, Mood};

/// Aesthetic theme of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    Cyberfemme,
    Organic,
    Tech,
    Vintage,
    #[default]
    Neutral,
}

const CYBERFEMME_ACCENTS: &[Rgb] = &[
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0x00, 0xff, 0xff),
    Rgb::new(0xff, 0x14, 0x93),
    Rgb::new(0x93, 0x70, 0xdb),
];

const ORGANIC_ACCENTS: &[Rgb] = &[
    Rgb::new(0x8f, 0xbc, 0x8f),
    Rgb::new(0xda, 0xa5, 0x20),
    Rgb::new(0xf4, 0xa4, 0x60),
    Rgb::new(0x90, 0xee, 0x90),
];

const TECH_ACCENTS: &[Rgb] = &[
    Rgb::new(0x00, 0x80, 0xff),
    Rgb::new(0x00, 0xbf, 0xff),
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0xc0, 0xc0, 0xc0),
];

const VINTAGE_ACCENTS: &[Rgb] = &[
    Rgb::new(0xda, 0xa5, 0x20),
    Rgb::new(0xcd, 0x85, 0x3f),
    Rgb::new(0xf5, 0xde, 0xb3),
    Rgb::new(0xff, 0xe4, 0xb5),
];

impl ThemeName {
    pub const ALL: &'static [ThemeName] = &[
        ThemeName::Cyberfemme,
        ThemeName::Organic,
        ThemeName::Tech,
        ThemeName::Vintage,
        ThemeName::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Cyberfemme => "cyberfemme",
            ThemeName::Organic => "organic",
            ThemeName::Tech => "tech",
            ThemeName::Vintage => "vintage",
            ThemeName::Neutral => "neutral",
        }
    }

    pub fn transition(&self) -> TransitionStyle {
        match self {
            ThemeName::Cyberfemme => TransitionStyle::Glitch,
            ThemeName::Organic => TransitionStyle::SoftFade,
            ThemeName::Tech => TransitionStyle::Pixel,
            ThemeName::Vintage => TransitionStyle::Dissolve,
            ThemeName::Neutral => TransitionStyle::Fade,
        }
    }

    /// Playback speed multiplier for the theme's transition.
    pub fn transition_speed(&self) -> f32 {
        match self {
            ThemeName::Cyberfemme => 1.2,
            ThemeName::Organic => 0.8,
            ThemeName::Vintage => 0.9,
            ThemeName::Tech | ThemeName::Neutral => 1.0,
        }
    }

    /// Fixed accent set. Empty for `Neutral`, which borrows from the palette.
    pub fn accent_colors(&self) -> &'static [Rgb] {
        match self {
            ThemeName::Cyberfemme => CYBERFEMME_ACCENTS,
            ThemeName::Organic => ORGANIC_ACCENTS,
            ThemeName::Tech => TECH_ACCENTS,
            ThemeName::Vintage => VINTAGE_ACCENTS,
            ThemeName::Neutral => &[],
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ThemeNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyberfemme" => Ok(ThemeName::Cyberfemme),
            "organic" => Ok(ThemeName::Organic),
            "tech" => Ok(ThemeName::Tech),
            "vintage" => Ok(ThemeName::Vintage),
            "neutral" | "default" => Ok(ThemeName::Neutral),
            _ => Err(ThemeNameParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown theme: {0}")]
pub struct ThemeNameParseError(String);

/// Slide transition associated with a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Glitch,
    SoftFade,
    Pixel,
    Dissolve,
    #[default]
    Fade,
}

impl TransitionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Glitch => "glitch",
            TransitionStyle::SoftFade => "soft_fade",
            TransitionStyle::Pixel => "pixel",
            TransitionStyle::Dissolve => "dissolve",
            TransitionStyle::Fade => "fade",
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cheap fingerprint of a collection's contents.
///
/// Two scans of an unchanged directory produce equal signatures regardless
/// of listing order. Only equality is meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CollectionSignature {
    pub file_count: u64,
    /// Newest modification time among qualifying files, epoch milliseconds.
    pub latest_modified_ms: i64,
}

impl CollectionSignature {
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}

impl fmt::Display for CollectionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.file_count, self.latest_modified_ms)
    }
}

/// Theme classification result for one collection.
///
/// Immutable once stored; a new analysis replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThemeProfile {
    pub theme_name: ThemeName,
    /// `[0, 1]`
    pub confidence: f32,
    /// Top palette colors by frequency, at most five.
    pub primary_colors: Vec<Rgb>,
    pub accent_colors: Vec<Rgb>,
    pub transition_style: TransitionStyle,
    pub transition_speed: f32,
    pub temperature_bias: ColorTemperature,
    pub energy_level: EnergyLevel,
    /// Mood → share of the sample.
    pub mood_profile: BTreeMap<Mood, f32>,
    /// Number of images the profile was computed from.
    pub sample_size: u32,
    #[serde(default)]
    pub signature: CollectionSignature,
    pub analyzed_at: DateTime<Utc>,
}

impl ThemeProfile {
    pub fn with_signature(mut self, signature: CollectionSignature) -> Self {
        self.signature = signature;
        self
    }
}

/// Bookkeeping about the analysis run that produced a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSummary {
    /// Qualifying images in the collection.
    pub total_images: u64,
    pub analyzed_count: u32,
    pub failed_count: u32,
    pub processing_ms: u64,
}

/// What the theme cache persists per collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThemeRecord {
    pub profile: ThemeProfile,
    pub summary: AnalysisSummary,
}

impl ThemeRecord {
    pub fn new(profile: ThemeProfile, summary: AnalysisSummary) -> Self {
        Self { profile, summary }
    }

    pub fn signature(&self) -> CollectionSignature {
        self.profile.signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!("cyberfemme".parse::<ThemeName>().unwrap(), ThemeName::Cyberfemme);
        assert_eq!("ORGANIC".parse::<ThemeName>().unwrap(), ThemeName::Organic);
        assert_eq!("default".parse::<ThemeName>().unwrap(), ThemeName::Neutral);
        assert!("baroque".parse::<ThemeName>().is_err());
    }

    #[test]
    fn test_transition_is_derived_from_theme() {
        assert_eq!(ThemeName::Cyberfemme.transition(), TransitionStyle::Glitch);
        assert_eq!(ThemeName::Organic.transition(), TransitionStyle::SoftFade);
        assert_eq!(ThemeName::Tech.transition(), TransitionStyle::Pixel);
        assert_eq!(ThemeName::Vintage.transition(), TransitionStyle::Dissolve);
        assert_eq!(ThemeName::Neutral.transition(), TransitionStyle::Fade);
    }

    #[test]
    fn test_accents_only_for_named_themes() {
        for theme in ThemeName::ALL {
            let accents = theme.accent_colors();
            if *theme == ThemeName::Neutral {
                assert!(accents.is_empty());
            } else {
                assert_eq!(accents.len(), 4);
            }
        }
        assert_eq!(ThemeName::Tech.accent_colors()[0].to_hex(), "#0080ff");
    }

    #[test]
    fn test_transition_serializes_snake_case() {
        let json = serde_json::to_string(&TransitionStyle::SoftFade).unwrap();
        assert_eq!(json, "\"soft_fade\"");
    }

    #[test]
    fn test_record_roundtrip_through_json() {
        let profile = ThemeProfile {
            theme_name: ThemeName::Organic,
            confidence: 0.8,
            primary_colors: vec![Rgb::new(0x8b, 0x45, 0x13)],
            accent_colors: ThemeName::Organic.accent_colors().to_vec(),
            transition_style: TransitionStyle::SoftFade,
            transition_speed: 0.8,
            temperature_bias: ColorTemperature::Warm,
            energy_level: EnergyLevel::Low,
            mood_profile: [(Mood::Peaceful, 0.8), (Mood::Serene, 0.2)].into_iter().collect(),
            sample_size: 5,
            signature: CollectionSignature {
                file_count: 12,
                latest_modified_ms: 1_700_000_000_000,
            },
            analyzed_at: Utc::now(),
        };
        let record = ThemeRecord::new(profile, AnalysisSummary::default());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["profile"]["primary_colors"][0], "#8b4513");
        assert!(json["profile"]["mood_profile"]["peaceful"].is_number());

        let back: ThemeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_profile_schema_generates() {
        let schema = schemars::schema_for!(ThemeProfile);
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"]["theme_name"].is_object());
    }
}
