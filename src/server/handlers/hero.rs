//! Hero builder state and live preview handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::json_body;
use crate::compose::{export::encode_png, preview};
use crate::error::HeroError;
use crate::layout::LayoutDescriptor;
use crate::store::{HeroPatch, HeroState};

use super::super::state::AppState;

/// GET /api/hero/state - Current editor state.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<HeroState> {
    Json(state.hero.read().await.clone())
}

/// PUT /api/hero/state - Apply a partial update and return the new state.
pub async fn put_state(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HeroPatch>, JsonRejection>,
) -> Result<Json<HeroState>, HeroError> {
    let patch = json_body(payload)?;
    let mut hero = state.hero.write().await;
    hero.apply(patch);
    Ok(Json(hero.clone()))
}

/// POST /api/hero/reset - Restore defaults.
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<HeroState> {
    let mut hero = state.hero.write().await;
    hero.reset();
    tracing::info!("hero state reset");
    Json(hero.clone())
}

#[derive(Debug, Deserialize)]
pub struct MediaRequest {
    pub url: String,
}

/// POST /api/hero/media - Add a URL to the media library.
pub async fn add_media(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> Result<Json<Vec<String>>, HeroError> {
    let request = json_body(payload)?;
    if request.url.trim().is_empty() {
        return Err(HeroError::InvalidInput("url is required".to_string()));
    }
    let mut hero = state.hero.write().await;
    hero.add_to_media_library(request.url);
    Ok(Json(hero.media_library.clone()))
}

/// DELETE /api/hero/media - Remove a URL from the media library.
pub async fn remove_media(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> Result<Json<Vec<String>>, HeroError> {
    let request = json_body(payload)?;
    let mut hero = state.hero.write().await;
    hero.remove_from_media_library(&request.url);
    Ok(Json(hero.media_library.clone()))
}

/// POST /api/hero/logo - Pick a logo with the editor's default placement.
pub async fn select_logo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MediaRequest>, JsonRejection>,
) -> Result<Json<HeroState>, HeroError> {
    let request = json_body(payload)?;
    if request.url.trim().is_empty() {
        return Err(HeroError::InvalidInput("url is required".to_string()));
    }
    let mut hero = state.hero.write().await;
    hero.select_logo(request.url.trim());
    tracing::info!(position = hero.logo_position.name(), scale = hero.logo_scale, "logo selected");
    Ok(Json(hero.clone()))
}

/// Snapshot the state and bring the preview's decoded images up to date.
async fn synced_snapshot(state: &AppState) -> HeroState {
    let snapshot = state.hero.read().await.clone();
    preview::sync(&state.preview, &snapshot, &state.acquirer).await;
    snapshot
}

/// GET /api/hero/preview - PNG of the live preview surface.
///
/// Unreachable assets are left out of the picture; this endpoint only fails
/// when the surface cannot be encoded.
pub async fn preview(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, HeroError> {
    let snapshot = synced_snapshot(&state).await;
    let mut compositor = state.preview.clone().lock_owned().await;

    let png = tokio::task::spawn_blocking(move || encode_png(compositor.render(&snapshot)))
        .await
        .map_err(|e| HeroError::CompositionFailed(format!("Task error: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}

/// GET /api/hero/preview/layout - Geometry of the live preview.
pub async fn preview_layout(State(state): State<Arc<AppState>>) -> Json<LayoutDescriptor> {
    let snapshot = synced_snapshot(&state).await;
    Json(state.preview.lock().await.layout(&snapshot))
}
