//! Export and layout API handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::json_body;
use crate::assets::AssetSlot;
use crate::compose::export::{self, EXPORT_FILENAME, ExportRequest};
use crate::error::HeroError;
use crate::layout::{self, BlockFlow, LayoutDescriptor};

use super::super::state::AppState;

/// Largest canvas the layout endpoint will describe.
const MAX_LAYOUT_CANVAS_PX: u32 = 4096;

/// POST /api/export - Render the hero visual as a downloadable PNG.
pub async fn export(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HeroError> {
    let request = json_body(payload)?;
    let png = export::export_from_request(request, state.export_canvas(), &state.acquirer, state.face.clone()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        png,
    ))
}

/// Request body for the layout endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    #[serde(flatten)]
    pub export: ExportRequest,
    /// Surface edge; defaults to the export canvas.
    #[serde(default)]
    pub canvas_px: Option<u32>,
    /// Natural logo size; when absent and a logo is referenced, it is loaded.
    #[serde(default)]
    pub logo_width: Option<u32>,
    #[serde(default)]
    pub logo_height: Option<u32>,
    /// `centered` or `fixed-top`.
    #[serde(default)]
    pub block_flow: Option<String>,
}

/// POST /api/layout - Describe where every element goes without rendering.
pub async fn layout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LayoutRequest>, JsonRejection>,
) -> Result<Json<LayoutDescriptor>, HeroError> {
    let request = json_body(payload)?;
    request.export.validate()?;

    let mut canvas = state.export_canvas();
    if let Some(px) = request.canvas_px {
        if px == 0 || px > MAX_LAYOUT_CANVAS_PX {
            return Err(HeroError::InvalidInput(format!(
                "canvasPx must be between 1 and {}",
                MAX_LAYOUT_CANVAS_PX
            )));
        }
        canvas = canvas.with_size(px);
    }
    if let Some(name) = request.block_flow.as_deref() {
        let flow = BlockFlow::from_name(name)
            .ok_or_else(|| HeroError::InvalidInput(format!("Unknown block flow: {}", name)))?;
        canvas = canvas.with_block_flow(flow);
    }

    let logo_natural = match (request.logo_width, request.logo_height) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => {
            let (_, logo_ref) = request.export.references()?;
            state
                .acquirer
                .load_optional(AssetSlot::Logo, logo_ref.as_ref())
                .await?
                .map(|logo| (logo.width(), logo.height()))
        }
    };

    let descriptor = layout::plan(
        &canvas,
        logo_natural,
        &request.export.logo_spec(),
        &request.export.title,
        &request.export.description,
        state.face.as_ref(),
    );
    Ok(Json(descriptor))
}
