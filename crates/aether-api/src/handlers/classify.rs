//! Single image classification handler.

use std::path::PathBuf;

use aether_engine::analyze_image;
use aether_models::{ColorHarmony, ColorTemperature, MoodResult};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(length(min = 1, max = 4096))]
    pub image_path: String,
}

#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    /// Hex strings, most frequent first.
    pub dominant_colors: Vec<String>,
    pub temperature: ColorTemperature,
    pub color_harmony: ColorHarmony,
    pub color_diversity: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub complexity: f32,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub ok: bool,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
    /// Sniffed container format, e.g. `"JPEG"`.
    pub format: Option<String>,
    pub megapixels: f32,
    pub features: FeatureSummary,
    pub mood: MoodResult,
    /// Seconds.
    pub recommended_display_duration: f32,
}

/// Analyse one image.
pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Json<ClassifyResponse>> {
    request.validate()?;
    let path = PathBuf::from(&request.image_path);

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|_| ApiError::not_found(format!("Image not found: {}", path.display())))?;
    if !meta.is_file() {
        return Err(ApiError::not_found(format!("Not a file: {}", path.display())));
    }
    if meta.len() > state.engine_config.max_image_bytes {
        return Err(ApiError::bad_request(format!(
            "Image exceeds {} bytes",
            state.engine_config.max_image_bytes
        )));
    }

    let image = analyze_image(&path, state.engine_config.image_timeout).await?;
    let features = image.features;

    Ok(Json(ClassifyResponse {
        ok: true,
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        width: features.width,
        height: features.height,
        aspect_ratio: features.aspect_ratio,
        format: features.format.clone(),
        megapixels: features.megapixels(),
        features: FeatureSummary {
            dominant_colors: features.dominant_colors.iter().map(|c| c.color.to_hex()).collect(),
            temperature: features.temperature,
            color_harmony: features.color_harmony,
            color_diversity: features.color_diversity,
            saturation: features.saturation,
            brightness: features.brightness,
            contrast: features.contrast,
            complexity: features.complexity,
        },
        mood: image.mood,
        recommended_display_duration: image.display_duration,
    }))
}
