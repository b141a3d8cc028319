//! # Compositing
//!
//! Turns a [`LayoutDescriptor`] into pixels. Both variants share [`paint`];
//! they differ only in surface size, resampling filter and output sink.
//!
//! - [`export`]: 1080x1080 PNG bytes, on demand
//! - [`preview`]: low-resolution surface, re-rendered on state changes

pub mod export;
pub mod preview;

use image::{DynamicImage, Rgba, RgbaImage, imageops, imageops::FilterType};

use crate::layout::{CanvasSpec, LayoutDescriptor, cover_crop};
use crate::typeface::Typeface;

/// Decoded image layers; either may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layers<'a> {
    pub background: Option<&'a DynamicImage>,
    pub logo: Option<&'a DynamicImage>,
}

/// Draw background, logo and text onto a fresh canvas.
///
/// Missing layers are skipped; the fallback fill shows through. Blank lines
/// in the layout only advance the cursor and draw nothing.
pub fn paint(
    canvas_spec: &CanvasSpec,
    layers: Layers<'_>,
    layout: &LayoutDescriptor,
    face: &dyn Typeface,
    filter: FilterType,
) -> RgbaImage {
    let size = canvas_spec.size_px;
    let mut canvas = RgbaImage::from_pixel(size, size, canvas_spec.fallback_color);

    if let Some(background) = layers.background {
        let crop = cover_crop(background.width(), background.height(), size, size);
        if crop.width > 0 && crop.height > 0 {
            let fitted = background
                .crop_imm(crop.x, crop.y, crop.width, crop.height)
                .resize_exact(size, size, filter)
                .to_rgba8();
            imageops::overlay(&mut canvas, &fitted, 0, 0);
        }
    }

    if let (Some(logo), Some(rect)) = (layers.logo, layout.logo) {
        let placement = rect.to_pixels();
        if placement.width > 0 && placement.height > 0 {
            let resized = logo
                .resize_exact(placement.width, placement.height, filter)
                .to_rgba8();
            imageops::overlay(&mut canvas, &resized, placement.x, placement.y);
        }
    }

    for line in layout.lines() {
        if line.text.trim().is_empty() {
            continue;
        }
        face.draw(
            &mut canvas,
            &line.text,
            line.x,
            line.y,
            line.font_px,
            line.weight,
            Rgba(line.color),
        );
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand;
    use crate::layout::{LogoPosition, LogoSpec, plan};
    use crate::typeface::BitmapFace;

    #[test]
    fn test_empty_canvas_is_fallback() {
        let spec = CanvasSpec::preview(64);
        let layout = plan(&spec, None, &LogoSpec::default(), "", "", &BitmapFace);
        let canvas = paint(&spec, Layers::default(), &layout, &BitmapFace, FilterType::Triangle);
        assert_eq!(canvas.dimensions(), (64, 64));
        assert!(canvas.pixels().all(|p| *p == brand::FALLBACK_COLOR));
    }

    #[test]
    fn test_background_covers_canvas() {
        let spec = CanvasSpec::preview(50);
        let background = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, Rgba([200, 0, 0, 255])));
        let layout = plan(&spec, None, &LogoSpec::default(), "", "", &BitmapFace);
        let layers = Layers {
            background: Some(&background),
            logo: None,
        };
        let canvas = paint(&spec, layers, &layout, &BitmapFace, FilterType::Triangle);
        assert!(canvas.pixels().all(|p| p.0 == [200, 0, 0, 255]));
    }

    #[test]
    fn test_logo_lands_in_rect() {
        let spec = CanvasSpec::export();
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 100, Rgba([0, 255, 0, 255])));
        let logo_spec = LogoSpec::brand(LogoPosition::TopLeft, 1.0, 32.0);
        let layout = plan(&spec, Some((400, 100)), &logo_spec, "", "", &BitmapFace);
        let layers = Layers {
            background: None,
            logo: Some(&logo),
        };
        let canvas = paint(&spec, layers, &layout, &BitmapFace, FilterType::Triangle);
        // 200x50 logo at (32, 32)
        assert_eq!(canvas.get_pixel(40, 40).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(231, 81).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(233, 40).0, brand::FALLBACK_COLOR.0);
        assert_eq!(canvas.get_pixel(40, 83).0, brand::FALLBACK_COLOR.0);
    }

    #[test]
    fn test_text_is_drawn() {
        let spec = CanvasSpec::export();
        let layout = plan(&spec, None, &LogoSpec::default(), "Hello", "", &BitmapFace);
        let canvas = paint(&spec, Layers::default(), &layout, &BitmapFace, FilterType::Triangle);
        assert!(canvas.pixels().any(|p| *p != brand::FALLBACK_COLOR));
    }
}
