//! Theme classification.
//!
//! Collection statistics are reduced to a small set of [`Signal`]s and run
//! through [`RULES`], an ordered table of themes and the conditions that
//! select them. The first rule whose conditions all hold wins; when none
//! does the collection is `Neutral`.
//!
//! Each satisfied condition contributes a normalized margin in `[0, 1]`
//! describing how comfortably it held, and the rule's confidence is
//! `0.5 + 0.5 * mean(margins)`.

use aether_models::{
    CollectionSignature, CollectionStats, ColorTemperature, EnergyLevel, Hsv, Mood, Rgb, ThemeName,
    ThemeProfile,
};
use chrono::Utc;

/// Number of palette colors carried into a profile.
pub const PRIMARY_COLOR_COUNT: usize = 5;

/// Confidence reported when no rule matched.
pub const NEUTRAL_CONFIDENCE: f32 = 0.3;

const INTENSE_MOODS: &[Mood] = &[Mood::Vibrant, Mood::Cinematic, Mood::Dramatic];
const CALM_MOODS: &[Mood] = &[Mood::Peaceful, Mood::Serene];

/// Collection measurement a rule condition looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Palette share of saturated magentas, violets, blues and cyans.
    CyberShare,
    /// Palette share of browns, tans, ochres and muted greens.
    EarthShare,
    MeanSaturation,
    MeanBrightness,
    MeanContrast,
    WarmShare,
    CoolShare,
    /// Share of vibrant, cinematic or dramatic images.
    IntenseMoodShare,
    /// Share of peaceful or serene images.
    CalmMoodShare,
    DramaticShare,
}

/// Acceptable range for a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f32),
    AtMost(f32),
    Between(f32, f32),
}

impl Bound {
    fn holds(&self, value: f32) -> bool {
        match *self {
            Bound::AtLeast(t) => value >= t,
            Bound::AtMost(t) => value <= t,
            Bound::Between(lo, hi) => (lo..=hi).contains(&value),
        }
    }

    /// How comfortably `value` satisfies the bound, `[0, 1]`.
    fn margin(&self, value: f32) -> f32 {
        let margin = match *self {
            Bound::AtLeast(t) if t >= 1.0 => 1.0,
            Bound::AtLeast(t) => (value - t) / (1.0 - t),
            Bound::AtMost(t) if t <= 0.0 => 1.0,
            Bound::AtMost(t) => (t - value) / t,
            Bound::Between(lo, hi) => {
                let half = (hi - lo) / 2.0;
                if half <= 0.0 {
                    1.0
                } else {
                    1.0 - (value - (lo + half)).abs() / half
                }
            }
        };
        margin.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub signal: Signal,
    pub bound: Bound,
}

impl Condition {
    const fn new(signal: Signal, bound: Bound) -> Self {
        Self { signal, bound }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeRule {
    pub theme: ThemeName,
    pub conditions: &'static [Condition],
}

/// Ordered theme rules; earlier rules take priority.
pub const RULES: &[ThemeRule] = &[
    ThemeRule {
        theme: ThemeName::Cyberfemme,
        conditions: &[
            Condition::new(Signal::CyberShare, Bound::AtLeast(0.5)),
            Condition::new(Signal::MeanSaturation, Bound::AtLeast(0.6)),
            Condition::new(Signal::IntenseMoodShare, Bound::AtLeast(0.5)),
        ],
    },
    ThemeRule {
        theme: ThemeName::Organic,
        conditions: &[
            Condition::new(Signal::EarthShare, Bound::AtLeast(0.5)),
            Condition::new(Signal::CalmMoodShare, Bound::AtLeast(0.5)),
        ],
    },
    ThemeRule {
        theme: ThemeName::Tech,
        conditions: &[
            Condition::new(Signal::MeanContrast, Bound::AtLeast(0.5)),
            Condition::new(Signal::CoolShare, Bound::AtLeast(0.5)),
            Condition::new(Signal::DramaticShare, Bound::AtLeast(0.4)),
        ],
    },
    ThemeRule {
        theme: ThemeName::Vintage,
        conditions: &[
            Condition::new(Signal::WarmShare, Bound::AtLeast(0.5)),
            Condition::new(Signal::MeanSaturation, Bound::AtMost(0.4)),
            Condition::new(Signal::MeanBrightness, Bound::Between(0.3, 0.7)),
        ],
    },
];

/// Signals computed once per classification.
#[derive(Debug, Clone, Copy)]
struct Signals {
    cyber_share: f32,
    earth_share: f32,
    mean_saturation: f32,
    mean_brightness: f32,
    mean_contrast: f32,
    warm_share: f32,
    cool_share: f32,
    intense_mood_share: f32,
    calm_mood_share: f32,
    dramatic_share: f32,
}

impl Signals {
    fn from_stats(stats: &CollectionStats) -> Self {
        Self {
            cyber_share: palette_share(stats, is_cyber_color),
            earth_share: palette_share(stats, is_earth_color),
            mean_saturation: stats.mean_saturation,
            mean_brightness: stats.mean_brightness,
            mean_contrast: stats.mean_contrast,
            warm_share: stats.temperature_share(ColorTemperature::Warm),
            cool_share: stats.temperature_share(ColorTemperature::Cool),
            intense_mood_share: stats.mood_share(INTENSE_MOODS),
            calm_mood_share: stats.mood_share(CALM_MOODS),
            dramatic_share: stats.mood_share(&[Mood::Dramatic]),
        }
    }

    fn get(&self, signal: Signal) -> f32 {
        match signal {
            Signal::CyberShare => self.cyber_share,
            Signal::EarthShare => self.earth_share,
            Signal::MeanSaturation => self.mean_saturation,
            Signal::MeanBrightness => self.mean_brightness,
            Signal::MeanContrast => self.mean_contrast,
            Signal::WarmShare => self.warm_share,
            Signal::CoolShare => self.cool_share,
            Signal::IntenseMoodShare => self.intense_mood_share,
            Signal::CalmMoodShare => self.calm_mood_share,
            Signal::DramaticShare => self.dramatic_share,
        }
    }
}

impl ThemeRule {
    /// Confidence if every condition holds, `None` otherwise.
    fn evaluate(&self, signals: &Signals) -> Option<f32> {
        let mut margin_sum = 0.0;
        for condition in self.conditions {
            let value = signals.get(condition.signal);
            if !condition.bound.holds(value) {
                return None;
            }
            margin_sum += condition.bound.margin(value);
        }
        let mean = margin_sum / self.conditions.len().max(1) as f32;
        Some((0.5 + 0.5 * mean).clamp(0.0, 1.0))
    }
}

/// Classify a collection into a theme.
///
/// The returned profile carries an empty signature; the caller that knows
/// which collection state was analysed stamps it.
pub fn classify_theme(stats: &CollectionStats) -> ThemeProfile {
    let signals = Signals::from_stats(stats);
    let (theme_name, confidence) = RULES
        .iter()
        .find_map(|rule| rule.evaluate(&signals).map(|confidence| (rule.theme, confidence)))
        .unwrap_or((ThemeName::Neutral, NEUTRAL_CONFIDENCE));

    let primary_colors: Vec<Rgb> = stats
        .palette
        .iter()
        .take(PRIMARY_COLOR_COUNT)
        .map(|entry| entry.color)
        .collect();

    ThemeProfile {
        theme_name,
        confidence,
        primary_colors,
        accent_colors: accent_colors(theme_name, stats),
        transition_style: theme_name.transition(),
        transition_speed: theme_name.transition_speed(),
        temperature_bias: stats.temperature_distribution.dominant(),
        energy_level: EnergyLevel::from_score(stats.mean_energy),
        mood_profile: stats.mood_profile(),
        sample_size: stats.sample_size,
        signature: CollectionSignature::default(),
        analyzed_at: Utc::now(),
    }
}

/// Neutral collections borrow the palette entries after the primaries.
fn accent_colors(theme: ThemeName, stats: &CollectionStats) -> Vec<Rgb> {
    let fixed = theme.accent_colors();
    if !fixed.is_empty() {
        return fixed.to_vec();
    }

    let borrowed: Vec<Rgb> = stats
        .palette
        .iter()
        .skip(PRIMARY_COLOR_COUNT)
        .take(3)
        .map(|entry| entry.color)
        .collect();
    if borrowed.is_empty() {
        vec![Rgb::WHITE]
    } else {
        borrowed
    }
}

fn palette_share(stats: &CollectionStats, in_family: fn(Hsv) -> bool) -> f32 {
    let total = stats.palette_total();
    if total <= 0.0 {
        return 0.0;
    }
    let matched: f32 = stats
        .palette
        .iter()
        .filter(|entry| in_family(entry.color.to_hsv()))
        .map(|entry| entry.frequency)
        .sum();
    matched / total
}

/// Saturated magentas, violets, blues and cyans.
fn is_cyber_color(hsv: Hsv) -> bool {
    (180.0..=345.0).contains(&hsv.hue) && hsv.saturation >= 0.35 && hsv.value >= 0.25
}

/// Browns, tans and ochres, plus muted (not neon) greens.
fn is_earth_color(hsv: Hsv) -> bool {
    let earthy_saturation = (0.15..=0.9).contains(&hsv.saturation);
    let earthy_value = (0.2..=0.9).contains(&hsv.value);
    if !earthy_saturation || !earthy_value {
        return false;
    }
    let brown = (15.0..=50.0).contains(&hsv.hue);
    let green = (60.0..=150.0).contains(&hsv.hue) && hsv.value <= 0.6;
    brown || green
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_models::{PaletteEntry, TemperatureCounts, TransitionStyle};
    use std::collections::BTreeMap;

    fn palette(hexes: &[&str]) -> Vec<PaletteEntry> {
        let frequency = 1.0 / hexes.len() as f32;
        hexes
            .iter()
            .map(|hex| PaletteEntry {
                color: Rgb::from_hex(hex).unwrap(),
                frequency,
            })
            .collect()
    }

    fn stats(
        palette: Vec<PaletteEntry>,
        moods: &[(Mood, u32)],
        temperatures: TemperatureCounts,
        mean_saturation: f32,
    ) -> CollectionStats {
        let mood_distribution: BTreeMap<Mood, u32> = moods.iter().copied().collect();
        CollectionStats {
            sample_size: mood_distribution.values().sum(),
            temperature_distribution: temperatures,
            mood_distribution,
            mean_saturation,
            mean_brightness: 0.5,
            mean_contrast: 0.4,
            mean_complexity: 0.4,
            mean_energy: 0.5,
            palette,
        }
    }

    #[test]
    fn test_cyberfemme_collection() {
        let stats = stats(
            palette(&["#FF00FF", "#9932CC", "#00FFFF", "#DA70D6"]),
            &[(Mood::Vibrant, 2), (Mood::Cinematic, 2), (Mood::Dramatic, 1)],
            TemperatureCounts { warm: 1, cool: 3, neutral: 1 },
            0.82,
        );
        let profile = classify_theme(&stats);

        assert_eq!(profile.theme_name, ThemeName::Cyberfemme);
        assert!(profile.confidence >= 0.85, "confidence {}", profile.confidence);
        assert_eq!(profile.transition_style, TransitionStyle::Glitch);
        assert_eq!(profile.primary_colors[0].to_hex(), "#ff00ff");
        assert_eq!(profile.accent_colors, ThemeName::Cyberfemme.accent_colors());
    }

    #[test]
    fn test_organic_collection() {
        let stats = stats(
            palette(&["#556B2F", "#8B4513", "#D2B48C", "#A0522D"]),
            &[(Mood::Peaceful, 4), (Mood::Serene, 1)],
            TemperatureCounts { warm: 4, cool: 0, neutral: 1 },
            0.45,
        );
        let profile = classify_theme(&stats);

        assert_eq!(profile.theme_name, ThemeName::Organic);
        assert_eq!(profile.transition_style, TransitionStyle::SoftFade);
        assert!(profile.confidence > 0.5);
    }

    #[test]
    fn test_cyberfemme_rule_outranks_organic() {
        let stats = stats(
            palette(&["#FF00FF", "#8B4513"]),
            &[(Mood::Vibrant, 3), (Mood::Peaceful, 3)],
            TemperatureCounts { warm: 3, cool: 3, neutral: 0 },
            0.8,
        );
        let signals = Signals::from_stats(&stats);
        assert!(RULES[0].evaluate(&signals).is_some());
        assert!(RULES[1].evaluate(&signals).is_some());

        assert_eq!(classify_theme(&stats).theme_name, ThemeName::Cyberfemme);
    }

    #[test]
    fn test_tech_collection() {
        let mut stats = stats(
            palette(&["#101820", "#0080FF", "#C0C0C0"]),
            &[(Mood::Dramatic, 3), (Mood::Mysterious, 1), (Mood::Balanced, 1)],
            TemperatureCounts { warm: 0, cool: 4, neutral: 1 },
            0.3,
        );
        stats.mean_contrast = 0.7;

        let profile = classify_theme(&stats);
        assert_eq!(profile.theme_name, ThemeName::Tech);
        assert_eq!(profile.transition_style, TransitionStyle::Pixel);
        assert_eq!(profile.temperature_bias, ColorTemperature::Cool);
    }

    #[test]
    fn test_vintage_collection() {
        let stats = stats(
            palette(&["#C8B496", "#E6D2AA", "#FFFFFF"]),
            &[(Mood::Balanced, 3), (Mood::Peaceful, 1)],
            TemperatureCounts { warm: 3, cool: 0, neutral: 1 },
            0.25,
        );
        let profile = classify_theme(&stats);
        assert_eq!(profile.theme_name, ThemeName::Vintage);
        assert_eq!(profile.transition_style, TransitionStyle::Dissolve);
    }

    #[test]
    fn test_fallback_is_neutral() {
        let stats = stats(
            palette(&["#808080", "#7F7F7F", "#A0A0A0", "#101010", "#F0F0F0", "#202020", "#E0E0E0"]),
            &[(Mood::Balanced, 5)],
            TemperatureCounts { warm: 0, cool: 0, neutral: 5 },
            0.05,
        );
        let profile = classify_theme(&stats);

        assert_eq!(profile.theme_name, ThemeName::Neutral);
        assert_eq!(profile.confidence, NEUTRAL_CONFIDENCE);
        assert_eq!(profile.transition_style, TransitionStyle::Fade);
        assert_eq!(profile.primary_colors.len(), PRIMARY_COLOR_COUNT);
        assert_eq!(profile.accent_colors.len(), 2);
    }

    #[test]
    fn test_neutral_without_spare_palette_uses_white_accent() {
        let stats = stats(
            palette(&["#808080"]),
            &[(Mood::Balanced, 1)],
            TemperatureCounts { warm: 0, cool: 0, neutral: 1 },
            0.0,
        );
        assert_eq!(classify_theme(&stats).accent_colors, vec![Rgb::WHITE]);
    }

    #[test]
    fn test_bound_margins() {
        assert_eq!(Bound::AtLeast(0.5).margin(0.5), 0.0);
        assert_eq!(Bound::AtLeast(0.5).margin(1.0), 1.0);
        assert_eq!(Bound::AtMost(0.4).margin(0.0), 1.0);
        assert!((Bound::Between(0.3, 0.7).margin(0.5) - 1.0).abs() < 1e-6);
        assert!(Bound::Between(0.3, 0.7).margin(0.3) < 1e-6);
        assert!(!Bound::Between(0.3, 0.7).holds(0.71));
    }

    #[test]
    fn test_color_families() {
        assert!(is_cyber_color(Rgb::from_hex("#9932CC").unwrap().to_hsv()));
        assert!(is_cyber_color(Rgb::from_hex("#DA70D6").unwrap().to_hsv()));
        assert!(!is_cyber_color(Rgb::from_hex("#8B4513").unwrap().to_hsv()));

        assert!(is_earth_color(Rgb::from_hex("#8B4513").unwrap().to_hsv()));
        assert!(is_earth_color(Rgb::from_hex("#556B2F").unwrap().to_hsv()));
        // neon green is not earthy
        assert!(!is_earth_color(Rgb::from_hex("#00FF00").unwrap().to_hsv()));
    }
}
