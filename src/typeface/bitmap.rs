//! Spleen 12x24 bitmap face.
//!
//! Each glyph cell is `px / 2` wide and `px` tall; the 12x24 source bitmap is
//! scaled with nearest neighbour. Bold is a double strike offset by one
//! source pixel's width.

use image::{Rgba, RgbaImage};
use spleen_font::{FONT_12X24, PSF2Font};

use super::{FontWeight, Typeface, blend_pixel};

const GLYPH_W: usize = 12;
const GLYPH_H: usize = 24;

/// Built-in monospace face.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFace;

impl BitmapFace {
    /// Horizontal advance per character at `px`.
    pub fn advance(px: f32) -> f32 {
        px * GLYPH_W as f32 / GLYPH_H as f32
    }
}

impl Typeface for BitmapFace {
    fn measure(&self, text: &str, px: f32, _weight: FontWeight) -> f32 {
        text.chars().count() as f32 * Self::advance(px)
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

        let mut spleen = match PSF2Font::new(FONT_12X24) {
            Ok(font) => font,
            Err(_) => {
                tracing::warn!("failed to load Spleen 12x24 glyphs, skipping text");
                return;
            }
        };

        let mut lookup = |ch: char| -> [bool; GLYPH_W * GLYPH_H] {
            let mut glyph = [false; GLYPH_W * GLYPH_H];
            let utf8_bytes = ch.to_string();
            if let Some(spleen_glyph) = spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
                for (row_y, row) in spleen_glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < GLYPH_H && col_x < GLYPH_W {
                            glyph[row_y * GLYPH_W + col_x] = on;
                        }
                    }
                }
            } else {
                draw_box(&mut glyph);
            }
            glyph
        };

        let advance = Self::advance(px);
        let cell_w = advance.round().max(1.0) as usize;
        let cell_h = px.round().max(1.0) as usize;
        let top = y.round() as i64;
        let strikes: &[i64] = match weight {
            FontWeight::Regular => &[0],
            FontWeight::Bold => &[0, (px / GLYPH_H as f32).round().max(1.0) as i64],
        };

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let glyph = lookup(ch);
            let left = (x + i as f32 * advance).round() as i64;

            for dy in 0..cell_h {
                let sy = dy * GLYPH_H / cell_h;
                for dx in 0..cell_w {
                    let sx = dx * GLYPH_W / cell_w;
                    if !glyph[sy * GLYPH_W + sx] {
                        continue;
                    }
                    for &offset in strikes {
                        blend_pixel(canvas, left + dx as i64 + offset, top + dy as i64, color, 1.0);
                    }
                }
            }
        }
    }
}

/// Outline box for characters missing from the font.
fn draw_box(glyph: &mut [bool; GLYPH_W * GLYPH_H]) {
    for x in 0..GLYPH_W {
        glyph[x] = true;
        glyph[(GLYPH_H - 1) * GLYPH_W + x] = true;
    }
    for y in 0..GLYPH_H {
        glyph[y * GLYPH_W] = true;
        glyph[y * GLYPH_W + GLYPH_W - 1] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn test_measure_is_linear() {
        let face = BitmapFace;
        assert_eq!(face.measure("Hello", 64.0, FontWeight::Bold), 160.0);
        assert_eq!(face.measure("", 64.0, FontWeight::Regular), 0.0);
    }

    #[test]
    fn test_draw_lights_pixels() {
        let mut canvas = RgbaImage::from_pixel(200, 60, Rgba([0, 0, 0, 255]));
        BitmapFace.draw(&mut canvas, "Hi", 4.0, 4.0, 48.0, FontWeight::Regular, Rgba([255, 255, 255, 255]));
        assert!(lit(&canvas) > 0);
    }

    #[test]
    fn test_bold_covers_more() {
        let white = Rgba([255, 255, 255, 255]);
        let mut regular = RgbaImage::from_pixel(200, 60, Rgba([0, 0, 0, 255]));
        let mut bold = regular.clone();
        BitmapFace.draw(&mut regular, "Hi", 0.0, 0.0, 48.0, FontWeight::Regular, white);
        BitmapFace.draw(&mut bold, "Hi", 0.0, 0.0, 48.0, FontWeight::Bold, white);
        assert!(lit(&bold) > lit(&regular));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let white = Rgba([255, 255, 255, 255]);
        let mut a = RgbaImage::from_pixel(300, 40, Rgba([0, 0, 0, 255]));
        let mut b = a.clone();
        BitmapFace.draw(&mut a, "Same text", 1.5, 2.5, 23.7, FontWeight::Bold, white);
        BitmapFace.draw(&mut b, "Same text", 1.5, 2.5, 23.7, FontWeight::Bold, white);
        assert_eq!(a, b);
    }

    #[test]
    fn test_spaces_draw_nothing() {
        let mut canvas = RgbaImage::from_pixel(100, 30, Rgba([0, 0, 0, 255]));
        BitmapFace.draw(&mut canvas, "   ", 0.0, 0.0, 24.0, FontWeight::Regular, Rgba([255, 255, 255, 255]));
        assert_eq!(lit(&canvas), 0);
    }
}
