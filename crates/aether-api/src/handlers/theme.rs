//! Collection theme handlers.

use std::path::PathBuf;

use aether_engine::LookupOptions;
use aether_models::{AnalysisSummary, ThemeProfile};
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Collection theme analysis request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CollectionThemeRequest {
    /// Defaults to the configured collection.
    #[validate(length(min = 1, max = 4096))]
    pub collection_path: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub force_refresh: bool,
}

/// Counts describing the analysis behind a theme.
#[derive(Debug, Serialize)]
pub struct AnalysisStats {
    pub total_images: u64,
    pub analyzed_count: u32,
    pub failed_count: u32,
    pub processing_time_ms: u64,
}

impl AnalysisStats {
    fn new(summary: &AnalysisSummary, processing_time_ms: u64) -> Self {
        Self {
            total_images: summary.total_images,
            analyzed_count: summary.analyzed_count,
            failed_count: summary.failed_count,
            processing_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionThemeResponse {
    pub ok: bool,
    pub collection_path: String,
    pub theme: ThemeProfile,
    pub stats: AnalysisStats,
    pub cache_hit: bool,
}

/// Analyse (or fetch the cached theme of) a collection.
pub async fn analyze_collection_theme(
    State(state): State<AppState>,
    Json(request): Json<CollectionThemeRequest>,
) -> ApiResult<Json<CollectionThemeResponse>> {
    request.validate()?;

    let path = request
        .collection_path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.engine_config.collection_path.clone());

    let lookup = state
        .cache
        .lookup(
            &path,
            LookupOptions {
                sample_size: request.sample_size,
                force_refresh: request.force_refresh,
            },
        )
        .await?;

    info!(
        collection = %path.display(),
        theme = %lookup.record.profile.theme_name,
        cache_hit = lookup.cache_hit,
        elapsed_ms = lookup.elapsed_ms,
        "Collection theme served"
    );

    Ok(Json(CollectionThemeResponse {
        ok: true,
        collection_path: path.display().to_string(),
        stats: AnalysisStats::new(&lookup.record.summary, lookup.elapsed_ms),
        theme: lookup.record.profile,
        cache_hit: lookup.cache_hit,
    }))
}

#[derive(Debug, Serialize)]
pub struct CurrentThemeResponse {
    pub ok: bool,
    pub collection_path: String,
    pub active_theme: ThemeProfile,
    pub last_analyzed: DateTime<Utc>,
    pub source: &'static str,
    pub stats: AnalysisStats,
}

/// Stored theme of the configured collection. Never computes.
pub async fn current_theme(State(state): State<AppState>) -> ApiResult<Json<CurrentThemeResponse>> {
    let path = &state.engine_config.collection_path;
    let record = state.cache.current(path).await?.ok_or_else(|| {
        ApiError::not_found(format!("No theme has been analysed for {}", path.display()))
    })?;

    Ok(Json(CurrentThemeResponse {
        ok: true,
        collection_path: path.display().to_string(),
        last_analyzed: record.profile.analyzed_at,
        source: "cache",
        stats: AnalysisStats::new(&record.summary, record.summary.processing_ms),
        active_theme: record.profile,
    }))
}
