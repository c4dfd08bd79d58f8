//! Shared data models for the Aetherwave theme service.
//!
//! This crate provides Serde-serializable types for:
//! - Colors, palettes and color temperature
//! - Per-image features and mood results
//! - Collection statistics
//! - Theme profiles and the records the theme cache persists

pub mod color;
pub mod features;
pub mod mood;
pub mod stats;
pub mod theme;

// Re-export common types
pub use color::{ColorHarmony, ColorParseError, ColorTemperature, Hsv, Rgb, WeightedColor};
pub use features::ImageFeatures;
pub use mood::{EmotionalTone, EnergyLevel, Mood, MoodResult};
pub use stats::{CollectionStats, PaletteEntry, TemperatureCounts};
pub use theme::{
    AnalysisSummary, CollectionSignature, ThemeName, ThemeProfile, ThemeRecord, TransitionStyle,
};
