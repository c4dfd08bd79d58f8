//! Mood vocabulary and per-image mood results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Emotional reading of an image.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Energetic,
    Serene,
    Dramatic,
    Mysterious,
    Cinematic,
    Vibrant,
    Dynamic,
    Peaceful,
    #[default]
    Balanced,
}

impl Mood {
    pub const ALL: &'static [Mood] = &[
        Mood::Energetic,
        Mood::Serene,
        Mood::Dramatic,
        Mood::Mysterious,
        Mood::Cinematic,
        Mood::Vibrant,
        Mood::Dynamic,
        Mood::Peaceful,
        Mood::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Serene => "serene",
            Mood::Dramatic => "dramatic",
            Mood::Mysterious => "mysterious",
            Mood::Cinematic => "cinematic",
            Mood::Vibrant => "vibrant",
            Mood::Dynamic => "dynamic",
            Mood::Peaceful => "peaceful",
            Mood::Balanced => "balanced",
        }
    }

    /// Moods that read as film-like for the cinematic score.
    pub fn is_cinematic(&self) -> bool {
        matches!(self, Mood::Dramatic | Mood::Mysterious | Mood::Cinematic)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = MoodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == lowered)
            .ok_or_else(|| MoodParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown mood: {0}")]
pub struct MoodParseError(String);

/// Coarse energy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }

    /// Numeric scale used when averaging across a collection.
    pub fn score(&self) -> f32 {
        match self {
            EnergyLevel::Low => 0.0,
            EnergyLevel::Medium => 0.5,
            EnergyLevel::High => 1.0,
        }
    }

    /// Nearest level for an averaged score.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.75 {
            EnergyLevel::High
        } else if score >= 0.25 {
            EnergyLevel::Medium
        } else {
            EnergyLevel::Low
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emotional tone of an image, read from brightness and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Uplifting,
    Calm,
    Contemplative,
    Intense,
    #[default]
    Neutral,
}

impl EmotionalTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalTone::Uplifting => "uplifting",
            EmotionalTone::Calm => "calm",
            EmotionalTone::Contemplative => "contemplative",
            EmotionalTone::Intense => "intense",
            EmotionalTone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mood classification of one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoodResult {
    pub primary_mood: Mood,
    pub emotional_tone: EmotionalTone,
    pub energy_level: EnergyLevel,
    /// `[0.3, 0.95]`
    pub confidence: f32,
    /// `[0, 1]`
    pub cinematic_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parse() {
        assert_eq!("vibrant".parse::<Mood>().unwrap(), Mood::Vibrant);
        assert_eq!("Peaceful".parse::<Mood>().unwrap(), Mood::Peaceful);
        assert!("gloomy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_mood_display_roundtrip() {
        for mood in Mood::ALL {
            assert_eq!(mood.to_string().parse::<Mood>().unwrap(), *mood);
        }
    }

    #[test]
    fn test_energy_from_score() {
        assert_eq!(EnergyLevel::from_score(0.0), EnergyLevel::Low);
        assert_eq!(EnergyLevel::from_score(0.5), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_score(0.8), EnergyLevel::High);
        assert_eq!(EnergyLevel::from_score(EnergyLevel::High.score()), EnergyLevel::High);
    }
}
