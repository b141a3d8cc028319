//! # Typefaces
//!
//! Text measurement and glyph drawing behind one trait, so layout and both
//! compositors are independent of where the glyphs come from.
//!
//! - [`BitmapFace`]: Spleen 12x24 bitmap glyphs scaled to the requested size.
//!   Always available and fully deterministic.
//! - [`TtfFace`]: anti-aliased TrueType rendering through `ab_glyph`, loaded
//!   from a font file at startup.

mod bitmap;
mod ttf;

pub use bitmap::BitmapFace;
pub use ttf::TtfFace;

use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::error::HeroError;

/// Font weight requested by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Measures and draws single lines of text.
pub trait Typeface: Send + Sync {
    /// Advance width of `text` at `px` font size.
    fn measure(&self, text: &str, px: f32, weight: FontWeight) -> f32;

    /// Draw `text` with its top edge at `y`, left-aligned at `x`.
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        px: f32,
        weight: FontWeight,
        color: Rgba<u8>,
    );
}

/// Load the configured typeface, falling back to the bitmap face.
pub fn load(
    regular: Option<&Path>,
    bold: Option<&Path>,
) -> Result<Arc<dyn Typeface>, HeroError> {
    match regular {
        Some(path) => {
            let face = TtfFace::from_files(path, bold)?;
            tracing::info!(font = %path.display(), "loaded TrueType face");
            Ok(Arc::new(face))
        }
        None => {
            tracing::info!("no font configured, using built-in bitmap face");
            Ok(Arc::new(BitmapFace))
        }
    }
}

/// Source-over blend `color` into the pixel at `(x, y)` with `coverage`.
///
/// Out-of-bounds coordinates are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color.0[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_alpha = dst.0[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let src = color.0[c] as f32;
        let existing = dst.0[c] as f32;
        let blended = (src * alpha + existing * dst_alpha * (1.0 - alpha)) / out_alpha;
        dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
