//! Collection-level statistics built from a sample of analysed images.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::color::{ColorTemperature, Rgb};
use crate::mood::Mood;

/// Number of sampled images per temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemperatureCounts {
    pub warm: u32,
    pub cool: u32,
    pub neutral: u32,
}

impl TemperatureCounts {
    pub fn record(&mut self, temperature: ColorTemperature) {
        *self.slot(temperature) += 1;
    }

    pub fn get(&self, temperature: ColorTemperature) -> u32 {
        match temperature {
            ColorTemperature::Warm => self.warm,
            ColorTemperature::Cool => self.cool,
            ColorTemperature::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> u32 {
        self.warm + self.cool + self.neutral
    }

    /// Majority temperature. Ties resolve to neutral, then warm over cool.
    pub fn dominant(&self) -> ColorTemperature {
        let top = self.warm.max(self.cool).max(self.neutral);
        if self.neutral == top {
            ColorTemperature::Neutral
        } else if self.warm == top {
            ColorTemperature::Warm
        } else {
            ColorTemperature::Cool
        }
    }

    fn slot(&mut self, temperature: ColorTemperature) -> &mut u32 {
        match temperature {
            ColorTemperature::Warm => &mut self.warm,
            ColorTemperature::Cool => &mut self.cool,
            ColorTemperature::Neutral => &mut self.neutral,
        }
    }
}

/// A representative color of the collection palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PaletteEntry {
    pub color: Rgb,
    /// Accumulated pixel share across the sample, normalized by sample size.
    pub frequency: f32,
}

/// Aggregated view of a sampled collection.
///
/// Created per analysis and dropped once the theme is classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionStats {
    /// Number of successfully analysed images, at least 1.
    pub sample_size: u32,
    pub temperature_distribution: TemperatureCounts,
    pub mood_distribution: BTreeMap<Mood, u32>,
    pub mean_saturation: f32,
    pub mean_brightness: f32,
    pub mean_contrast: f32,
    pub mean_complexity: f32,
    pub mean_energy: f32,
    /// Sorted by frequency descending; ties keep first-seen order.
    pub palette: Vec<PaletteEntry>,
}

impl CollectionStats {
    /// Fraction of the sample whose primary mood is one of `moods`.
    pub fn mood_share(&self, moods: &[Mood]) -> f32 {
        if self.sample_size == 0 {
            return 0.0;
        }
        let hits: u32 = moods
            .iter()
            .filter_map(|mood| self.mood_distribution.get(mood))
            .sum();
        hits as f32 / self.sample_size as f32
    }

    /// Fraction of the sample with the given temperature.
    pub fn temperature_share(&self, temperature: ColorTemperature) -> f32 {
        if self.sample_size == 0 {
            return 0.0;
        }
        self.temperature_distribution.get(temperature) as f32 / self.sample_size as f32
    }

    pub fn palette_total(&self) -> f32 {
        self.palette.iter().map(|entry| entry.frequency).sum()
    }

    /// Mood → fraction of the sample.
    pub fn mood_profile(&self) -> BTreeMap<Mood, f32> {
        self.mood_distribution
            .iter()
            .map(|(mood, count)| (*mood, *count as f32 / self.sample_size.max(1) as f32))
            .collect()
    }
}
