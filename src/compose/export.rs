//! Full-resolution export.
//!
//! [`render`] is the synchronous compositor; [`export_from_request`] wraps it
//! with reference parsing and concurrent asset loading for the HTTP endpoint
//! and the CLI.

use image::{DynamicImage, ImageFormat, RgbaImage, imageops::FilterType};
use serde::Deserialize;
use std::io::Cursor;
use std::sync::Arc;

use super::{Layers, paint};
use crate::assets::{AssetRef, AssetSlot, ImageAcquirer, non_empty};
use crate::brand;
use crate::error::HeroError;
use crate::layout::{self, CanvasSpec, LogoPosition, LogoSpec};
use crate::typeface::Typeface;

/// Filename offered to the browser.
pub const EXPORT_FILENAME: &str = "hero-visual.png";

/// Body of an export request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub logo_position: LogoPosition,
    #[serde(default = "default_logo_scale")]
    pub logo_scale: f32,
    #[serde(default = "default_logo_padding")]
    pub logo_padding: f32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

fn default_logo_scale() -> f32 {
    1.0
}

fn default_logo_padding() -> f32 {
    brand::LOGO_PADDING_PX
}

impl ExportRequest {
    /// Reject parameters no layout can honour.
    pub fn validate(&self) -> Result<(), HeroError> {
        if !self.logo_scale.is_finite() || self.logo_scale <= 0.0 {
            return Err(HeroError::InvalidInput(format!(
                "logoScale must be a positive number, got {}",
                self.logo_scale
            )));
        }
        if !self.logo_padding.is_finite() || self.logo_padding < 0.0 {
            return Err(HeroError::InvalidInput(format!(
                "logoPadding must be zero or positive, got {}",
                self.logo_padding
            )));
        }
        Ok(())
    }

    pub fn logo_spec(&self) -> LogoSpec {
        LogoSpec::brand(self.logo_position, self.logo_scale, self.logo_padding)
    }

    /// Parse both references; ephemeral handles fail here, before any fetch.
    pub fn references(&self) -> Result<(Option<AssetRef>, Option<AssetRef>), HeroError> {
        let background = non_empty(self.background_url.as_deref())
            .map(|raw| AssetRef::parse(AssetSlot::Background, raw))
            .transpose()?;
        let logo = non_empty(self.logo_url.as_deref())
            .map(|raw| AssetRef::parse(AssetSlot::Logo, raw))
            .transpose()?;
        Ok((background, logo))
    }
}

/// Compose layers and text into PNG bytes.
pub fn render(
    background: Option<&DynamicImage>,
    logo: Option<&DynamicImage>,
    logo_spec: &LogoSpec,
    canvas_spec: &CanvasSpec,
    title: &str,
    description: &str,
    face: &dyn Typeface,
) -> Result<Vec<u8>, HeroError> {
    let raster = render_raster(background, logo, logo_spec, canvas_spec, title, description, face);
    encode_png(&raster)
}

/// Compose layers and text into an RGBA buffer.
pub fn render_raster(
    background: Option<&DynamicImage>,
    logo: Option<&DynamicImage>,
    logo_spec: &LogoSpec,
    canvas_spec: &CanvasSpec,
    title: &str,
    description: &str,
    face: &dyn Typeface,
) -> RgbaImage {
    let logo_natural = logo.map(|l| (l.width(), l.height()));
    let plan = layout::plan(canvas_spec, logo_natural, logo_spec, title, description, face);
    let layers = Layers { background, logo };
    // Lanczos3 for export quality
    paint(canvas_spec, layers, &plan, face, FilterType::Lanczos3)
}

/// Encode a raster as PNG.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, HeroError> {
    let mut png_bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| HeroError::CompositionFailed(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

/// Resolve a request's assets and render it.
///
/// Background and logo are fetched concurrently and both must succeed before
/// compositing starts. Compositing runs on the blocking thread pool.
pub async fn export_from_request(
    request: ExportRequest,
    canvas_spec: CanvasSpec,
    acquirer: &ImageAcquirer,
    face: Arc<dyn Typeface>,
) -> Result<Vec<u8>, HeroError> {
    request.validate()?;
    let (background_ref, logo_ref) = request.references()?;

    let (background, logo) = tokio::try_join!(
        acquirer.load_optional(AssetSlot::Background, background_ref.as_ref()),
        acquirer.load_optional(AssetSlot::Logo, logo_ref.as_ref()),
    )?;

    let describe = |r: &Option<AssetRef>| r.as_ref().map_or_else(|| "none".to_string(), AssetRef::describe);
    tracing::info!(
        background = %describe(&background_ref),
        logo = %describe(&logo_ref),
        position = request.logo_position.name(),
        "exporting hero visual"
    );

    let logo_spec = request.logo_spec();
    tokio::task::spawn_blocking(move || {
        render(
            background.as_ref(),
            logo.as_ref(),
            &logo_spec,
            &canvas_spec,
            &request.title,
            &request.description,
            face.as_ref(),
        )
    })
    .await
    .map_err(|e| HeroError::CompositionFailed(format!("Task error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::BitmapFace;

    #[test]
    fn test_request_defaults() {
        let req: ExportRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.logo_position, LogoPosition::BottomRight);
        assert_eq!(req.logo_scale, 1.0);
        assert_eq!(req.logo_padding, 32.0);
        assert!(req.title.is_empty());
        req.validate().unwrap();
    }

    #[test]
    fn test_request_camel_case() {
        let req: ExportRequest = serde_json::from_str(
            r#"{"backgroundUrl":"https://x.test/bg.png","logoPosition":"top-left","logoScale":1.5,"logoPadding":52,"title":"T"}"#,
        )
        .unwrap();
        assert_eq!(req.background_url.as_deref(), Some("https://x.test/bg.png"));
        assert_eq!(req.logo_position, LogoPosition::TopLeft);
        assert_eq!(req.logo_spec().scale_factor, 1.5);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut req: ExportRequest = serde_json::from_str("{}").unwrap();
        req.logo_scale = -1.0;
        assert!(matches!(req.validate(), Err(HeroError::InvalidInput(_))));
        req.logo_scale = 1.0;
        req.logo_padding = f32::INFINITY;
        assert!(matches!(req.validate(), Err(HeroError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_references_are_absent() {
        let req: ExportRequest =
            serde_json::from_str(r#"{"backgroundUrl":"","logoUrl":"   "}"#).unwrap();
        let (bg, logo) = req.references().unwrap();
        assert!(bg.is_none());
        assert!(logo.is_none());
    }

    #[test]
    fn test_render_dimensions() {
        let spec = CanvasSpec::export();
        let raster = render_raster(None, None, &LogoSpec::default(), &spec, "Hi", "", &BitmapFace);
        assert_eq!(raster.dimensions(), (1080, 1080));
    }
}
