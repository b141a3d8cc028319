//! Logo and image upload handler.
//!
//! Uploads are turned into data URIs so the same reference works for the
//! preview and the export without any server-side storage.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::is_multipart;
use crate::assets::to_data_uri;
use crate::error::HeroError;

use super::super::state::AppState;

#[derive(Debug, Deserialize)]
struct InlineUpload {
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/upload - Accept `{image}` JSON or a multipart `file` field.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<UploadResponse>, HeroError> {
    let url = if is_multipart(request.headers()) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| HeroError::InvalidInput(format!("Multipart error: {}", e)))?;
        file_field_as_data_uri(&mut multipart).await?
    } else {
        let Json(body) = Json::<InlineUpload>::from_request(request, &())
            .await
            .map_err(|e| HeroError::InvalidInput(e.body_text()))?;
        body.image
            .filter(|i| !i.trim().is_empty())
            .ok_or_else(|| HeroError::InvalidInput("Image data is required".to_string()))?
    };

    state.hero.write().await.add_to_media_library(url.clone());
    Ok(Json(UploadResponse { url }))
}

async fn file_field_as_data_uri(multipart: &mut Multipart) -> Result<String, HeroError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HeroError::InvalidInput(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let declared = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| HeroError::InvalidInput(format!("Failed to read file: {}", e)))?;
        if bytes.is_empty() {
            return Err(HeroError::InvalidInput("File is empty".to_string()));
        }

        let mime = declared
            .filter(|m| m.starts_with("image/"))
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first()
                    .map(|m| m.essence_str().to_string())
                    .filter(|m| m.starts_with("image/"))
                    .unwrap_or_else(|| "image/png".to_string())
            });
        tracing::info!(%filename, %mime, bytes = bytes.len(), "received upload");
        return Ok(to_data_uri(&mime, &bytes));
    }
    Err(HeroError::InvalidInput("File is required".to_string()))
}
