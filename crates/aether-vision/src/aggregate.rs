//! Collection aggregation.

use std::collections::BTreeMap;

use aether_models::{CollectionStats, ImageFeatures, MoodResult, PaletteEntry, TemperatureCounts};

use crate::error::{VisionError, VisionResult};

/// Colors closer than this (Euclidean RGB) fall into the same palette bucket.
pub const PALETTE_MERGE_DISTANCE: f32 = 40.0;

/// Reduce per-image results into collection statistics.
///
/// Palette buckets are opened greedily in input order; a bucket's
/// representative is the color that opened it and its frequency is the sum
/// of the pixel shares merged into it, divided by the sample size.
pub fn aggregate(results: &[(ImageFeatures, MoodResult)]) -> VisionResult<CollectionStats> {
    if results.is_empty() {
        return Err(VisionError::InsufficientSample);
    }

    let n = results.len() as f32;
    let mut temperature_distribution = TemperatureCounts::default();
    let mut mood_distribution = BTreeMap::new();
    let mut palette: Vec<PaletteEntry> = Vec::new();
    let (mut saturation, mut brightness, mut contrast, mut complexity, mut energy) =
        (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for (features, mood) in results {
        temperature_distribution.record(features.temperature);
        *mood_distribution.entry(mood.primary_mood).or_insert(0u32) += 1;

        saturation += features.saturation;
        brightness += features.brightness;
        contrast += features.contrast;
        complexity += features.complexity;
        energy += mood.energy_level.score();

        for weighted in &features.dominant_colors {
            match palette
                .iter_mut()
                .find(|entry| entry.color.distance(weighted.color) < PALETTE_MERGE_DISTANCE)
            {
                Some(entry) => entry.frequency += weighted.weight,
                None => palette.push(PaletteEntry {
                    color: weighted.color,
                    frequency: weighted.weight,
                }),
            }
        }
    }

    for entry in &mut palette {
        entry.frequency /= n;
    }
    // stable: equal frequencies keep first-seen order
    palette.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));

    Ok(CollectionStats {
        sample_size: results.len() as u32,
        temperature_distribution,
        mood_distribution,
        mean_saturation: saturation / n,
        mean_brightness: brightness / n,
        mean_contrast: contrast / n,
        mean_complexity: complexity / n,
        mean_energy: energy / n,
        palette,
    })
}
