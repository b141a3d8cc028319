//! TrueType rendering through `ab_glyph`.
//!
//! Produces anti-aliased coverage which is blended straight into the RGBA
//! canvas. When no bold file is configured, bold is synthesized with a one
//! pixel double strike.

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};
use image::{Rgba, RgbaImage};
use std::path::Path;

use super::{FontWeight, Typeface, blend_pixel};
use crate::error::HeroError;

/// A regular face with an optional bold companion.
#[derive(Clone)]
pub struct TtfFace {
    regular: FontArc,
    bold: Option<FontArc>,
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace")
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl TtfFace {
    pub fn new(regular: FontArc, bold: Option<FontArc>) -> Self {
        Self { regular, bold }
    }

    /// Parse font bytes.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self, HeroError> {
        let regular = FontArc::try_from_vec(regular)
            .map_err(|e| HeroError::Font(format!("Invalid regular font: {}", e)))?;
        let bold = bold
            .map(|bytes| {
                FontArc::try_from_vec(bytes)
                    .map_err(|e| HeroError::Font(format!("Invalid bold font: {}", e)))
            })
            .transpose()?;
        Ok(Self::new(regular, bold))
    }

    /// Read and parse font files.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> Result<Self, HeroError> {
        let regular_bytes = std::fs::read(regular)?;
        let bold_bytes = bold.map(std::fs::read).transpose()?;
        Self::from_bytes(regular_bytes, bold_bytes)
    }

    /// Font used for `weight`, and whether bold must be synthesized.
    fn font_for(&self, weight: FontWeight) -> (&FontArc, bool) {
        match (weight, &self.bold) {
            (FontWeight::Bold, Some(bold)) => (bold, false),
            (FontWeight::Bold, None) => (&self.regular, true),
            (FontWeight::Regular, _) => (&self.regular, false),
        }
    }

    /// Glyph ids with their pen x positions, plus the total advance.
    fn layout_glyphs(font: &FontArc, text: &str, px: f32) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = font.as_scaled(px);
        let mut glyphs = Vec::new();
        let mut caret_x = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, caret_x));
            caret_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        (glyphs, caret_x)
    }
}

impl Typeface for TtfFace {
    fn measure(&self, text: &str, px: f32, weight: FontWeight) -> f32 {
        let (font, _) = self.font_for(weight);
        Self::layout_glyphs(font, text, px).1
    }

    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        px: f32,
        weight: FontWeight,
        color: Rgba<u8>,
    ) {
        if text.is_empty() || px <= 0.0 {
            return;
        }

        let (font, synthetic_bold) = self.font_for(weight);
        let baseline_y = y + font.as_scaled(px).ascent();
        let (glyphs, _) = Self::layout_glyphs(font, text, px);
        let strikes: &[f32] = if synthetic_bold { &[0.0, 1.0] } else { &[0.0] };

        for &offset in strikes {
            for &(glyph_id, glyph_x) in &glyphs {
                let glyph = glyph_id
                    .with_scale_and_position(px, point(x + glyph_x + offset, baseline_y));

                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        let px_x = gx as i64 + bounds.min.x as i64;
                        let px_y = gy as i64 + bounds.min.y as i64;
                        blend_pixel(canvas, px_x, px_y, color, coverage);
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_font_bytes() {
        let err = TtfFace::from_bytes(vec![0, 1, 2, 3], None).unwrap_err();
        assert!(err.to_string().contains("Invalid regular font"));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let err = TtfFace::from_files(Path::new("/nonexistent/font.ttf"), None).unwrap_err();
        assert!(matches!(err, HeroError::Io(_)));
    }
}
