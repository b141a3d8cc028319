//! # Brand Constants
//!
//! All values are locked for brand compliance and defined at the canonical
//! 1080px scale. A preview surface derives `S = preview_px / 1080` and
//! multiplies every pixel quantity by it.

use image::Rgba;

use crate::layout::{BlockFlow, LogoPosition};

/// Canonical export canvas edge, in pixels.
pub const CANVAS_PX: u32 = 1080;

/// Default preview surface edge, in pixels.
pub const PREVIEW_PX: u32 = 400;

pub const TITLE_FONT_PX: f32 = 64.0;
pub const DESC_FONT_PX: f32 = 48.0;
pub const DESC_LINE_HEIGHT_FACTOR: f32 = 1.3;

pub const CANVAS_PADDING_PX: f32 = 48.0;

/// Left edge of the title/description block.
pub const TEXT_LEFT_PADDING_PX: f32 = 98.0;

pub const LOGO_MAX_WIDTH_PX: f32 = 200.0;
pub const LOGO_MAX_HEIGHT_PX: f32 = 80.0;
pub const LOGO_PADDING_PX: f32 = 32.0;

/// Placement applied whenever a logo is picked in the editor.
pub const LOGO_POSITION_UI_DEFAULT: LogoPosition = LogoPosition::TopLeft;
pub const LOGO_SCALE_UI_DEFAULT: f32 = 1.5;
pub const LOGO_PADDING_UI_DEFAULT_PX: f32 = 52.0;

pub const LOGO_SCALE_MIN: f32 = 0.5;
pub const LOGO_SCALE_MAX: f32 = 2.0;

/// Fill used when no background is set.
pub const FALLBACK_COLOR: Rgba<u8> = Rgba([18, 18, 18, 255]);

/// Lavender tint used for the title.
pub const TITLE_COLOR: Rgba<u8> = Rgba([0xE8, 0xE3, 0xFF, 255]);

/// Title tint at 85% opacity.
pub const DESC_COLOR: Rgba<u8> = Rgba([0xE8, 0xE3, 0xFF, 217]);

/// Block-flow policy shared by preview and export.
///
/// The centered policy stacks title and description around the canvas
/// midline. Switch to [`BlockFlow::FIXED_TOP`] to anchor the title 313px
/// from the top instead.
pub const DEFAULT_BLOCK_FLOW: BlockFlow = BlockFlow::CENTERED;

/// Clamp a logo scale factor into the brand range.
pub fn clamp_logo_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(LOGO_SCALE_MIN, LOGO_SCALE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_logo_scale() {
        assert_eq!(clamp_logo_scale(0.1), 0.5);
        assert_eq!(clamp_logo_scale(1.25), 1.25);
        assert_eq!(clamp_logo_scale(9.0), 2.0);
        assert_eq!(clamp_logo_scale(f32::NAN), 1.0);
    }

    #[test]
    fn test_text_block_fits_canvas() {
        let max_width = CANVAS_PX as f32 - 2.0 * TEXT_LEFT_PADDING_PX;
        assert_eq!(max_width, 884.0);
    }
}
