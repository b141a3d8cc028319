//! # Layout
//!
//! Pure, deterministic placement of every element on the hero canvas.
//!
//! Both compositors call [`plan`] and draw what it returns; neither derives
//! geometry on its own. The preview passes a [`CanvasSpec`] sized to the
//! preview surface, the export passes the canonical 1080px spec.
//!
//! ## Modules
//!
//! - [`geometry`]: logo aspect-fit, corner anchoring, background cover-crop
//! - [`text`]: word wrap and title/description block flow

pub mod geometry;
pub mod text;

pub use geometry::{CropRect, LogoPosition, LogoSpec, PixelRect, Rect, compute_logo_rect, cover_crop};
pub use text::{BlockLayout, PlacedLine, PositionedLine, layout_block, layout_paragraph};

use image::Rgba;
use serde::Serialize;

use crate::brand;
use crate::typeface::Typeface;

/// Vertical placement policy for the title/description block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum BlockFlow {
    /// Title starts `top_px` from the canvas top; description follows after `gap_px`.
    #[serde(rename_all = "camelCase")]
    FixedTop { top_px: f32, gap_px: f32 },
    /// The whole block is centered vertically, with `gap_px` between title and description.
    #[serde(rename_all = "camelCase")]
    Centered { gap_px: f32 },
}

impl BlockFlow {
    pub const FIXED_TOP: BlockFlow = BlockFlow::FixedTop {
        top_px: 313.0,
        gap_px: 64.0,
    };

    pub const CENTERED: BlockFlow = BlockFlow::Centered { gap_px: 50.0 };

    /// Gap between title and description at canonical scale.
    pub fn gap_px(&self) -> f32 {
        match *self {
            BlockFlow::FixedTop { gap_px, .. } | BlockFlow::Centered { gap_px } => gap_px,
        }
    }

    /// Parse a policy name (`centered` or `fixed-top`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "centered" | "center" => Some(BlockFlow::CENTERED),
            "fixed-top" | "top" => Some(BlockFlow::FIXED_TOP),
            _ => None,
        }
    }
}

/// Canvas parameters for one render.
///
/// All pixel quantities are stored at canonical scale; [`CanvasSpec::scale`]
/// converts them to the target surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    /// Edge of the surface being drawn.
    pub size_px: u32,
    /// Edge at which the brand constants are defined.
    pub canonical_px: u32,
    pub padding_px: f32,
    pub title_desc_padding_px: f32,
    pub title_font_px: f32,
    pub desc_font_px: f32,
    pub desc_line_height_factor: f32,
    pub title_color: Rgba<u8>,
    pub desc_color: Rgba<u8>,
    pub fallback_color: Rgba<u8>,
    pub block_flow: BlockFlow,
}

impl CanvasSpec {
    /// Canonical 1080px export canvas.
    pub fn export() -> Self {
        Self {
            size_px: brand::CANVAS_PX,
            canonical_px: brand::CANVAS_PX,
            padding_px: brand::CANVAS_PADDING_PX,
            title_desc_padding_px: brand::TEXT_LEFT_PADDING_PX,
            title_font_px: brand::TITLE_FONT_PX,
            desc_font_px: brand::DESC_FONT_PX,
            desc_line_height_factor: brand::DESC_LINE_HEIGHT_FACTOR,
            title_color: brand::TITLE_COLOR,
            desc_color: brand::DESC_COLOR,
            fallback_color: brand::FALLBACK_COLOR,
            block_flow: brand::DEFAULT_BLOCK_FLOW,
        }
    }

    /// Preview surface of `preview_px`.
    pub fn preview(preview_px: u32) -> Self {
        Self::export().with_size(preview_px)
    }

    pub fn with_size(mut self, size_px: u32) -> Self {
        self.size_px = size_px;
        self
    }

    pub fn with_block_flow(mut self, block_flow: BlockFlow) -> Self {
        self.block_flow = block_flow;
        self
    }

    /// Scale factor `S` from canonical to surface pixels.
    pub fn scale(&self) -> f32 {
        self.size_px as f32 / self.canonical_px as f32
    }
}

/// Geometry-only description of a render: where each element goes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDescriptor {
    pub canvas_px: u32,
    pub scale: f32,
    pub logo: Option<Rect>,
    pub title: Vec<PlacedLine>,
    pub description: Vec<PlacedLine>,
    pub block_top: f32,
    pub block_height: f32,
}

impl LayoutDescriptor {
    /// All lines in draw order.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.title.iter().chain(self.description.iter())
    }
}

/// Compute the full layout for one render.
///
/// `logo_natural` is the decoded logo size, or `None` when no logo is set.
pub fn plan(
    canvas: &CanvasSpec,
    logo_natural: Option<(u32, u32)>,
    logo_spec: &LogoSpec,
    title: &str,
    description: &str,
    face: &dyn Typeface,
) -> LayoutDescriptor {
    let scale = canvas.scale();
    let logo = logo_natural
        .map(|(w, h)| compute_logo_rect(w, h, logo_spec, canvas.size_px as f32, scale));
    let block = layout_block(title, description, canvas, face);

    LayoutDescriptor {
        canvas_px: canvas.size_px,
        scale,
        logo,
        title: block.title,
        description: block.description,
        block_top: block.top,
        block_height: block.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::BitmapFace;

    #[test]
    fn test_preview_scale() {
        let spec = CanvasSpec::preview(400);
        assert!((spec.scale() - 400.0 / 1080.0).abs() < 1e-6);
        assert_eq!(CanvasSpec::export().scale(), 1.0);
    }

    #[test]
    fn test_plan_without_logo() {
        let plan = plan(
            &CanvasSpec::export(),
            None,
            &LogoSpec::default(),
            "Hello World",
            "",
            &BitmapFace,
        );
        assert!(plan.logo.is_none());
        assert_eq!(plan.title.len(), 1);
        assert!(plan.description.is_empty());
    }

    #[test]
    fn test_plan_parity() {
        let spec = LogoSpec::brand(LogoPosition::TopRight, 1.5, 52.0);
        let export = plan(&CanvasSpec::export(), Some((400, 100)), &spec, "Hi", "There", &BitmapFace);
        let preview = plan(&CanvasSpec::preview(540), Some((400, 100)), &spec, "Hi", "There", &BitmapFace);
        let logo = preview.logo.unwrap().scaled(2.0);
        let expected = export.logo.unwrap();
        assert!((logo.x - expected.x).abs() < 1e-3);
        assert!((logo.w - expected.w).abs() < 1e-3);
        assert!((preview.block_top * 2.0 - export.block_top).abs() < 1e-3);
    }

    #[test]
    fn test_block_flow_names() {
        assert_eq!(BlockFlow::from_name("centered"), Some(BlockFlow::CENTERED));
        assert_eq!(BlockFlow::from_name("fixed-top"), Some(BlockFlow::FIXED_TOP));
        assert_eq!(BlockFlow::from_name("diagonal"), None);
    }
}
