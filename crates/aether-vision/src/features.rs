//! Per-image feature extraction.
//!
//! Turns one decoded image into [`ImageFeatures`]: a dominant palette with
//! its temperature, hue harmony and diversity, the tone statistics, and a
//! complexity score built from Canny edge density and Laplacian texture
//! variance.
//!
//! Images are downsampled before analysis so cost is bounded by
//! [`MAX_ANALYSIS_DIMENSION`] rather than by the source resolution.

use std::collections::HashMap;
use std::path::Path;

use aether_models::{ColorHarmony, ColorTemperature, ImageFeatures, Rgb, WeightedColor};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, RgbImage};
use imageproc::edges;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{VisionError, VisionResult};
use crate::formats::{format_name, is_supported_format, is_supported_path};

/// Longest side, in pixels, of the image actually analysed.
pub const MAX_ANALYSIS_DIMENSION: u32 = 512;

/// Number of dominant colors reported per image.
pub const PALETTE_SIZE: usize = 5;

/// Weight of edge density in the complexity score.
pub const EDGE_WEIGHT: f32 = 0.6;

/// Weight of texture variance in the complexity score.
pub const TEXTURE_WEIGHT: f32 = 0.4;

/// Edge pixel ratio that already counts as maximally busy.
const EDGE_DENSITY_SATURATION: f32 = 0.25;

/// Laplacian variance that already counts as maximally textured.
const TEXTURE_VARIANCE_SCALE: f64 = 4000.0;

const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Mean red-minus-blue beyond which a palette reads warm (or cool, negated).
const TEMPERATURE_THRESHOLD: f32 = 30.0;

/// Bits dropped per channel when bucketing colors (8 -> 5 bits).
const QUANT_SHIFT: u8 = 3;

/// Largest possible RGB distance, `sqrt(3 * 255^2)`.
const MAX_RGB_DISTANCE: f32 = 441.672_94;

/// Label used in errors for images that did not come from a file.
const MEMORY_ORIGIN: &str = "<memory>";

/// Read and analyse an image file.
pub fn extract_from_path(path: impl AsRef<Path>) -> VisionResult<ImageFeatures> {
    let path = path.as_ref();
    if !is_supported_path(path) {
        return Err(VisionError::unsupported(path.display().to_string()));
    }

    let bytes = std::fs::read(path).map_err(|e| VisionError::unreadable(path, e.to_string()))?;
    let (image, format) = decode(&bytes, path)?;
    extract_with_origin(&image, path, Some(format))
}

/// Analyse an encoded image held in memory.
pub fn extract_from_bytes(bytes: &[u8]) -> VisionResult<ImageFeatures> {
    let origin = Path::new(MEMORY_ORIGIN);
    let (image, format) = decode(bytes, origin)?;
    extract_with_origin(&image, origin, Some(format))
}

/// Analyse an already decoded image.
pub fn extract(image: &DynamicImage) -> VisionResult<ImageFeatures> {
    extract_with_origin(image, Path::new(MEMORY_ORIGIN), None)
}

/// Suggested on-screen time for an image, in seconds. Busier images stay longer.
pub fn recommended_display_duration(features: &ImageFeatures) -> f32 {
    8.0 + features.complexity * 4.0
}

fn decode(bytes: &[u8], origin: &Path) -> VisionResult<(DynamicImage, ImageFormat)> {
    if bytes.is_empty() {
        return Err(VisionError::unreadable(origin, "file is empty"));
    }

    let format = image::guess_format(bytes).map_err(|_| {
        VisionError::unsupported(format!("{}: not a recognized image", origin.display()))
    })?;
    if !is_supported_format(format) {
        return Err(VisionError::unsupported(format!(
            "{}: {:?}",
            origin.display(),
            format
        )));
    }

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| VisionError::unreadable(origin, e.to_string()))?;
    Ok((image, format))
}

fn extract_with_origin(
    image: &DynamicImage,
    origin: &Path,
    format: Option<ImageFormat>,
) -> VisionResult<ImageFeatures> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::unreadable(origin, "image has no pixels"));
    }

    let analysis = downsample(image);
    let rgb = analysis.to_rgb8();
    let gray = analysis.to_luma8();

    let dominant_colors = dominant_palette(&rgb);
    let temperature = palette_temperature(&dominant_colors);
    let color_harmony = color_harmony(&dominant_colors);
    let color_diversity = color_diversity(&dominant_colors);
    let tone = tone_statistics(&rgb);
    let edge_density = edge_density(&gray);
    let texture = texture_variance(&gray);
    let complexity = (EDGE_WEIGHT * edge_density + TEXTURE_WEIGHT * texture).clamp(0.0, 1.0);

    debug!(
        origin = %origin.display(),
        width,
        height,
        saturation = tone.saturation,
        brightness = tone.brightness,
        complexity,
        "Extracted image features"
    );

    Ok(ImageFeatures {
        dominant_colors,
        temperature,
        color_harmony,
        color_diversity,
        saturation: tone.saturation,
        brightness: tone.brightness,
        contrast: tone.contrast,
        complexity,
        edge_density,
        texture,
        width,
        height,
        aspect_ratio: width as f32 / height as f32,
        format: format.map(|f| format_name(f).to_string()),
    })
}

fn downsample(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width.max(height) <= MAX_ANALYSIS_DIMENSION {
        return image.clone();
    }
    image.resize(MAX_ANALYSIS_DIMENSION, MAX_ANALYSIS_DIMENSION, FilterType::Triangle)
}

/// Most frequent quantized colors, row-major first-seen order breaking ties.
fn dominant_palette(rgb: &RgbImage) -> Vec<WeightedColor> {
    // bucket key -> (count, first seen index)
    let mut buckets: HashMap<u16, (u32, usize)> = HashMap::new();
    for (index, pixel) in rgb.pixels().enumerate() {
        let [r, g, b] = pixel.0;
        let key = (u16::from(r >> QUANT_SHIFT) << 10)
            | (u16::from(g >> QUANT_SHIFT) << 5)
            | u16::from(b >> QUANT_SHIFT);
        buckets.entry(key).or_insert((0, index)).0 += 1;
    }

    let total = (rgb.width() as usize * rgb.height() as usize).max(1) as f32;
    let mut ranked: Vec<(u16, u32, usize)> = buckets
        .into_iter()
        .map(|(key, (count, first_seen))| (key, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(PALETTE_SIZE)
        .map(|(key, count, _)| WeightedColor::new(bucket_center(key), count as f32 / total))
        .collect()
}

fn bucket_center(key: u16) -> Rgb {
    let channel = |bits: u16| ((bits & 0x1f) as u8) << QUANT_SHIFT | (1 << (QUANT_SHIFT - 1));
    Rgb::new(channel(key >> 10), channel(key >> 5), channel(key))
}

fn palette_temperature(palette: &[WeightedColor]) -> ColorTemperature {
    let weight: f32 = palette.iter().map(|c| c.weight).sum();
    if weight <= 0.0 {
        return ColorTemperature::Neutral;
    }
    let warmth = palette.iter().map(|c| c.color.warmth() * c.weight).sum::<f32>() / weight;

    if warmth > TEMPERATURE_THRESHOLD {
        ColorTemperature::Warm
    } else if warmth < -TEMPERATURE_THRESHOLD {
        ColorTemperature::Cool
    } else {
        ColorTemperature::Neutral
    }
}

/// Hue harmony from the mean pairwise hue distance of the palette, wrapping
/// around the color wheel. Fewer than two colors is monochromatic.
fn color_harmony(palette: &[WeightedColor]) -> ColorHarmony {
    let hues: Vec<f32> = palette.iter().map(|c| c.color.to_hsv().hue).collect();
    let distances: Vec<f32> = pairs(&hues)
        .map(|(a, b)| {
            let diff = (a - b).abs();
            diff.min(360.0 - diff)
        })
        .collect();
    if distances.is_empty() {
        return ColorHarmony::Monochromatic;
    }
    let mean = distances.iter().sum::<f32>() / distances.len() as f32;
    ColorHarmony::from_mean_hue_distance(mean)
}

/// Mean pairwise RGB distance of the palette, normalized to `[0, 1]`.
fn color_diversity(palette: &[WeightedColor]) -> f32 {
    let colors: Vec<Rgb> = palette.iter().map(|c| c.color).collect();
    let distances: Vec<f32> = pairs(&colors).map(|(a, b)| a.distance(b)).collect();
    if distances.is_empty() {
        return 0.0;
    }
    let mean = distances.iter().sum::<f32>() / distances.len() as f32;
    (mean / MAX_RGB_DISTANCE).clamp(0.0, 1.0)
}

fn pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, &a)| items[i + 1..].iter().map(move |&b| (a, b)))
}

struct ToneStatistics {
    saturation: f32,
    brightness: f32,
    contrast: f32,
}

fn tone_statistics(rgb: &RgbImage) -> ToneStatistics {
    let (saturation_sum, luma_sum, luma_sq_sum, count) = rgb
        .as_raw()
        .par_chunks_exact(3)
        .map(|px| {
            let color = Rgb::new(px[0], px[1], px[2]);
            let luma = color.luma() as f64;
            (color.to_hsv().saturation as f64, luma, luma * luma, 1u64)
        })
        .reduce(
            || (0.0, 0.0, 0.0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
        );

    if count == 0 {
        return ToneStatistics {
            saturation: 0.0,
            brightness: 0.0,
            contrast: 0.0,
        };
    }

    let n = count as f64;
    let mean_luma = luma_sum / n;
    let variance = (luma_sq_sum / n - mean_luma * mean_luma).max(0.0);

    ToneStatistics {
        saturation: ((saturation_sum / n) as f32).clamp(0.0, 1.0),
        brightness: (mean_luma as f32).clamp(0.0, 1.0),
        // luma lives in [0, 1], so its standard deviation never exceeds 0.5
        contrast: ((variance.sqrt() / 0.5) as f32).clamp(0.0, 1.0),
    }
}

fn edge_density(gray: &GrayImage) -> f32 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let edges = edges::canny(gray, CANNY_LOW, CANNY_HIGH);
    let edge_pixels = edges.as_raw().par_iter().filter(|&&v| v > 0).count();
    let ratio = edge_pixels as f32 / (width as f32 * height as f32);
    (ratio / EDGE_DENSITY_SATURATION).clamp(0.0, 1.0)
}

/// Variance of the 4-neighbour Laplacian, normalized to `[0, 1]`.
fn texture_variance(gray: &GrayImage) -> f32 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let at = |x: u32, y: u32| gray.get_pixel(x, y)[0] as f64;
    let (sum, sum_sq, count) = (1..height - 1)
        .into_par_iter()
        .map(|y| {
            let mut row = (0.0f64, 0.0f64, 0u64);
            for x in 1..width - 1 {
                let lap = 4.0 * at(x, y) - at(x - 1, y) - at(x + 1, y) - at(x, y - 1) - at(x, y + 1);
                row.0 += lap;
                row.1 += lap * lap;
                row.2 += 1;
            }
            row
        })
        .reduce(|| (0.0, 0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));

    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    ((variance / TEXTURE_VARIANCE_SCALE) as f32).clamp(0.0, 1.0)
}
