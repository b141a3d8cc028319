//! Logo placement and background cover-crop.
//!
//! Pure functions: every quantity is derived from the canvas edge, the scale
//! factor `S` and the brand-locked [`LogoSpec`]. Callers at preview scale pass
//! `S < 1`; the export passes `S = 1`.

use serde::{Deserialize, Serialize};

use crate::brand;

/// Floating-point rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Multiply every component by `k`.
    pub fn scaled(&self, k: f32) -> Rect {
        Rect {
            x: self.x * k,
            y: self.y * k,
            w: self.w * k,
            h: self.h * k,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Round to integer placement. Width and height round independently of
    /// the origin so a rect never grows when it sits on a half pixel.
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: self.w.max(0.0).round() as u32,
            height: self.h.max(0.0).round() as u32,
        }
    }
}

/// Integer placement of a layer on the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Corner the logo is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum LogoPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl LogoPosition {
    pub const ALL: [LogoPosition; 4] = [
        LogoPosition::TopLeft,
        LogoPosition::TopRight,
        LogoPosition::BottomLeft,
        LogoPosition::BottomRight,
    ];

    /// Parse a position name. Unknown names fall back to bottom-right.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "top-left" => LogoPosition::TopLeft,
            "top-right" => LogoPosition::TopRight,
            "bottom-left" => LogoPosition::BottomLeft,
            _ => LogoPosition::BottomRight,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogoPosition::TopLeft => "top-left",
            LogoPosition::TopRight => "top-right",
            LogoPosition::BottomLeft => "bottom-left",
            LogoPosition::BottomRight => "bottom-right",
        }
    }
}

impl From<String> for LogoPosition {
    fn from(name: String) -> Self {
        LogoPosition::from_name(&name)
    }
}

/// Logo layout parameters.
///
/// `max_width_px`/`max_height_px` are the brand ceiling at canonical scale.
/// The ceiling is multiplied by `scale_factor` before fitting, so a 2x logo
/// may grow to 400x160 on the export canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoSpec {
    pub scale_factor: f32,
    pub padding_px: f32,
    pub position: LogoPosition,
    pub max_width_px: f32,
    pub max_height_px: f32,
}

impl Default for LogoSpec {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            padding_px: brand::LOGO_PADDING_PX,
            position: LogoPosition::BottomRight,
            max_width_px: brand::LOGO_MAX_WIDTH_PX,
            max_height_px: brand::LOGO_MAX_HEIGHT_PX,
        }
    }
}

impl LogoSpec {
    /// Brand-locked spec with user-controlled position, scale and padding.
    /// The scale factor is clamped into `[0.5, 2.0]`.
    pub fn brand(position: LogoPosition, scale_factor: f32, padding_px: f32) -> Self {
        Self {
            scale_factor: brand::clamp_logo_scale(scale_factor),
            padding_px,
            position,
            ..Self::default()
        }
    }
}

/// Fit `natural` into `(max_w, max_h)` preserving the aspect ratio.
///
/// Width is tried first; if the resulting height overflows, height becomes
/// the binding constraint. A degenerate natural size yields `(0, 0)`.
pub fn aspect_fit(natural_w: f32, natural_h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return (0.0, 0.0);
    }
    let aspect = natural_w / natural_h;
    let mut w = max_w;
    let mut h = w / aspect;
    if h > max_h {
        h = max_h;
        w = h * aspect;
    }
    (w, h)
}

/// Compute where the logo lands on a square canvas of `canvas_px`.
pub fn compute_logo_rect(
    natural_w: u32,
    natural_h: u32,
    spec: &LogoSpec,
    canvas_px: f32,
    scale: f32,
) -> Rect {
    let max_w = spec.max_width_px * scale * spec.scale_factor;
    let max_h = spec.max_height_px * scale * spec.scale_factor;
    let (w, h) = aspect_fit(natural_w as f32, natural_h as f32, max_w, max_h);
    let pad = spec.padding_px * scale;

    let (x, y) = match spec.position {
        LogoPosition::TopLeft => (pad, pad),
        LogoPosition::TopRight => (canvas_px - w - pad, pad),
        LogoPosition::BottomLeft => (pad, canvas_px - h - pad),
        LogoPosition::BottomRight => (canvas_px - w - pad, canvas_px - h - pad),
    };

    Rect { x, y, w, h }
}

/// Source-space crop window for cover fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered window of `src` with the aspect ratio of `dst`.
///
/// Scaling that window to `dst` covers both dimensions; the overflow is
/// cropped symmetrically.
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CropRect {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return CropRect {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        };
    }

    // Compare src_w/src_h against dst_w/dst_h without floating point.
    let lhs = src_w as u64 * dst_h as u64;
    let rhs = src_h as u64 * dst_w as u64;

    if lhs > rhs {
        // Source is wider: keep full height, trim the sides.
        let width = ((src_h as u64 * dst_w as u64) / dst_h as u64).max(1) as u32;
        CropRect {
            x: (src_w - width) / 2,
            y: 0,
            width,
            height: src_h,
        }
    } else {
        let height = ((src_w as u64 * dst_h as u64) / dst_w as u64).max(1) as u32;
        CropRect {
            x: 0,
            y: (src_h - height) / 2,
            width: src_w,
            height,
        }
    }
}
