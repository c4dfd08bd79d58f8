//! Mood and cinematic classification of a single image.
//!
//! A fixed, ordered decision table maps features to a primary mood; the
//! first matching rule wins. Confidence grows with how far the features sit
//! from the thresholds that decided the outcome.

use aether_models::{ColorTemperature, EmotionalTone, EnergyLevel, ImageFeatures, Mood, MoodResult};

const HIGH_SATURATION: f32 = 0.6;
const LOW_SATURATION: f32 = 0.3;
const BRIGHT: f32 = 0.6;
const LIGHT: f32 = 0.5;
const DARK: f32 = 0.35;
const CALM_COMPLEXITY: f32 = 0.4;
const BUSY_COMPLEXITY: f32 = 0.6;
const DYNAMIC_COMPLEXITY: f32 = 0.7;
const HIGH_CONTRAST: f32 = 0.5;

const MIN_CONFIDENCE: f32 = 0.3;
const MAX_CONFIDENCE: f32 = 0.95;
const CONFIDENCE_GAIN: f32 = 1.5;

const UPLIFTED_BRIGHTNESS: f32 = 0.6;
const SUBDUED_BRIGHTNESS: f32 = 0.4;

const HIGH_ENERGY: f32 = 0.7;
const MEDIUM_ENERGY: f32 = 0.4;

/// Classify the mood of an image. Deterministic for identical features.
pub fn classify(features: &ImageFeatures) -> MoodResult {
    let (primary_mood, margin) = decide(features);
    let confidence = (MIN_CONFIDENCE + CONFIDENCE_GAIN * margin).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    MoodResult {
        primary_mood,
        emotional_tone: emotional_tone(features),
        energy_level: energy_level(features),
        confidence,
        cinematic_score: cinematic_score(features, primary_mood),
    }
}

/// Returns the mood and the margin by which the deciding rule held.
fn decide(f: &ImageFeatures) -> (Mood, f32) {
    let sat = f.saturation;
    let bright = f.brightness;
    let complexity = f.complexity;

    if sat >= HIGH_SATURATION && f.temperature == ColorTemperature::Warm {
        let mood = if bright >= BRIGHT { Mood::Energetic } else { Mood::Vibrant };
        return (mood, (sat - HIGH_SATURATION).min((bright - BRIGHT).abs()));
    }

    if sat <= LOW_SATURATION && f.temperature == ColorTemperature::Cool && complexity <= CALM_COMPLEXITY {
        let mood = if bright >= LIGHT { Mood::Peaceful } else { Mood::Serene };
        let margin = (LOW_SATURATION - sat)
            .min(CALM_COMPLEXITY - complexity)
            .min((bright - LIGHT).abs());
        return (mood, margin);
    }

    if complexity >= BUSY_COMPLEXITY && f.contrast >= HIGH_CONTRAST {
        let mood = if bright < DARK { Mood::Mysterious } else { Mood::Dramatic };
        let margin = (complexity - BUSY_COMPLEXITY)
            .min(f.contrast - HIGH_CONTRAST)
            .min((bright - DARK).abs());
        return (mood, margin);
    }

    if sat >= HIGH_SATURATION {
        return (Mood::Cinematic, sat - HIGH_SATURATION);
    }

    if complexity >= DYNAMIC_COMPLEXITY {
        return (Mood::Dynamic, complexity - DYNAMIC_COMPLEXITY);
    }

    if sat <= LOW_SATURATION && bright >= LIGHT {
        return (Mood::Peaceful, (LOW_SATURATION - sat).min(bright - LIGHT));
    }

    (Mood::Balanced, fallback_margin(f))
}

/// Distance to the nearest threshold anywhere in the table.
fn fallback_margin(f: &ImageFeatures) -> f32 {
    [
        (f.saturation - HIGH_SATURATION).abs(),
        (f.saturation - LOW_SATURATION).abs(),
        (f.brightness - LIGHT).abs(),
        (f.complexity - BUSY_COMPLEXITY).abs(),
        (f.complexity - DYNAMIC_COMPLEXITY).abs(),
        (f.contrast - HIGH_CONTRAST).abs(),
    ]
    .into_iter()
    .fold(f32::MAX, f32::min)
}

fn emotional_tone(f: &ImageFeatures) -> EmotionalTone {
    if f.brightness > UPLIFTED_BRIGHTNESS {
        if f.temperature == ColorTemperature::Warm {
            EmotionalTone::Uplifting
        } else {
            EmotionalTone::Calm
        }
    } else if f.brightness < SUBDUED_BRIGHTNESS {
        if f.temperature == ColorTemperature::Cool {
            EmotionalTone::Contemplative
        } else {
            EmotionalTone::Intense
        }
    } else {
        EmotionalTone::Neutral
    }
}

fn energy_level(f: &ImageFeatures) -> EnergyLevel {
    let energy = (f.saturation + f.complexity) / 2.0;
    if energy > HIGH_ENERGY {
        EnergyLevel::High
    } else if energy > MEDIUM_ENERGY {
        EnergyLevel::Medium
    } else {
        EnergyLevel::Low
    }
}

/// How film-like an image reads: temperature, a brightness curve peaking
/// at 0.4, and mood affinity.
fn cinematic_score(f: &ImageFeatures, mood: Mood) -> f32 {
    let temperature = match f.temperature {
        ColorTemperature::Warm | ColorTemperature::Cool => 0.7,
        ColorTemperature::Neutral => 0.5,
    };
    let brightness = 1.0 - (f.brightness - 0.4).abs();
    let affinity = if mood.is_cinematic() { 0.8 } else { 0.4 };

    (0.3 * temperature + 0.3 * brightness + 0.4 * affinity).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_models::{ColorHarmony, Rgb, WeightedColor};

    fn features(
        temperature: ColorTemperature,
        saturation: f32,
        brightness: f32,
        contrast: f32,
        complexity: f32,
    ) -> ImageFeatures {
        ImageFeatures {
            dominant_colors: vec![WeightedColor::new(Rgb::new(120, 120, 120), 1.0)],
            temperature,
            color_harmony: ColorHarmony::Monochromatic,
            color_diversity: 0.0,
            saturation,
            brightness,
            contrast,
            complexity,
            edge_density: complexity,
            texture: complexity,
            width: 100,
            height: 100,
            aspect_ratio: 1.0,
            format: None,
        }
    }

    #[test]
    fn test_warm_saturated_moods() {
        let bright = classify(&features(ColorTemperature::Warm, 0.8, 0.8, 0.3, 0.3));
        assert_eq!(bright.primary_mood, Mood::Energetic);

        let dim = classify(&features(ColorTemperature::Warm, 0.8, 0.3, 0.3, 0.3));
        assert_eq!(dim.primary_mood, Mood::Vibrant);
    }

    #[test]
    fn test_cool_calm_moods() {
        let light = classify(&features(ColorTemperature::Cool, 0.1, 0.8, 0.2, 0.1));
        assert_eq!(light.primary_mood, Mood::Peaceful);

        let dim = classify(&features(ColorTemperature::Cool, 0.1, 0.2, 0.2, 0.1));
        assert_eq!(dim.primary_mood, Mood::Serene);
    }

    #[test]
    fn test_busy_contrasty_moods() {
        let dark = classify(&features(ColorTemperature::Neutral, 0.4, 0.1, 0.8, 0.9));
        assert_eq!(dark.primary_mood, Mood::Mysterious);

        let lit = classify(&features(ColorTemperature::Neutral, 0.4, 0.6, 0.8, 0.9));
        assert_eq!(lit.primary_mood, Mood::Dramatic);
    }

    #[test]
    fn test_remaining_rules_in_order() {
        let cool_saturated = classify(&features(ColorTemperature::Cool, 0.9, 0.5, 0.2, 0.2));
        assert_eq!(cool_saturated.primary_mood, Mood::Cinematic);

        let busy_flat = classify(&features(ColorTemperature::Neutral, 0.4, 0.5, 0.2, 0.9));
        assert_eq!(busy_flat.primary_mood, Mood::Dynamic);

        let pale = classify(&features(ColorTemperature::Warm, 0.1, 0.9, 0.2, 0.2));
        assert_eq!(pale.primary_mood, Mood::Peaceful);

        let middling = classify(&features(ColorTemperature::Neutral, 0.45, 0.4, 0.3, 0.3));
        assert_eq!(middling.primary_mood, Mood::Balanced);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let input = features(ColorTemperature::Warm, 0.72, 0.41, 0.33, 0.58);
        let first = classify(&input);
        for _ in 0..10 {
            assert_eq!(classify(&input), first);
        }
    }

    #[test]
    fn test_confidence_bounds() {
        let borderline = classify(&features(ColorTemperature::Cool, 0.6, 0.5, 0.2, 0.2));
        assert_eq!(borderline.confidence, MIN_CONFIDENCE);

        let emphatic = classify(&features(ColorTemperature::Warm, 1.0, 1.0, 0.2, 0.2));
        assert!(emphatic.confidence <= MAX_CONFIDENCE);
        assert!(emphatic.confidence > borderline.confidence);
    }

    #[test]
    fn test_energy_levels() {
        assert_eq!(
            classify(&features(ColorTemperature::Neutral, 0.9, 0.5, 0.5, 0.9)).energy_level,
            EnergyLevel::High
        );
        assert_eq!(
            classify(&features(ColorTemperature::Neutral, 0.5, 0.5, 0.5, 0.5)).energy_level,
            EnergyLevel::Medium
        );
        assert_eq!(
            classify(&features(ColorTemperature::Neutral, 0.1, 0.5, 0.5, 0.1)).energy_level,
            EnergyLevel::Low
        );
    }

    #[test]
    fn test_cinematic_score_prefers_dark_dramatic() {
        let dramatic = classify(&features(ColorTemperature::Cool, 0.4, 0.4, 0.8, 0.9));
        let peaceful = classify(&features(ColorTemperature::Neutral, 0.1, 0.9, 0.1, 0.1));
        assert!(dramatic.cinematic_score > peaceful.cinematic_score);
        assert!((0.0..=1.0).contains(&dramatic.cinematic_score));
    }

    #[test]
    fn test_emotional_tone() {
        let tone = |temperature, brightness| {
            classify(&features(temperature, 0.4, brightness, 0.3, 0.3)).emotional_tone
        };
        assert_eq!(tone(ColorTemperature::Warm, 0.8), EmotionalTone::Uplifting);
        assert_eq!(tone(ColorTemperature::Cool, 0.8), EmotionalTone::Calm);
        assert_eq!(tone(ColorTemperature::Neutral, 0.8), EmotionalTone::Calm);
        assert_eq!(tone(ColorTemperature::Cool, 0.2), EmotionalTone::Contemplative);
        assert_eq!(tone(ColorTemperature::Warm, 0.2), EmotionalTone::Intense);
        assert_eq!(tone(ColorTemperature::Warm, 0.5), EmotionalTone::Neutral);
        // bounds are exclusive
        assert_eq!(tone(ColorTemperature::Warm, 0.6), EmotionalTone::Neutral);
    }
}
