//! Word wrap and block flow for the title/description text.
//!
//! Line breaking always runs at canonical scale (font sizes and max width as
//! defined in [`crate::brand`]); only the resulting positions are multiplied
//! by `S`. A preview therefore breaks lines exactly where the export does.

use serde::Serialize;

use super::{BlockFlow, CanvasSpec};
use crate::typeface::{FontWeight, Typeface};

/// One line of a paragraph, relative to the paragraph top.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedLine {
    pub text: String,
    pub y_offset: f32,
}

impl PositionedLine {
    /// Blank slots advance the cursor but draw nothing.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A line placed on the canvas, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_px: f32,
    pub line_height_px: f32,
    pub weight: FontWeight,
    pub color: [u8; 4],
}

/// Title and description lines plus the block extent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    pub title: Vec<PlacedLine>,
    pub description: Vec<PlacedLine>,
    pub top: f32,
    pub height: f32,
}

/// Break `text` into lines no wider than `max_width`.
///
/// `\n` (and `\r\n`) are hard breaks. Each segment is trimmed, then words are
/// accumulated greedily while `measure(candidate) <= max_width`. A single word
/// wider than `max_width` is kept whole. Blank segments still occupy a slot.
/// Empty input produces no lines.
pub fn layout_paragraph<F>(
    text: &str,
    max_width: f32,
    line_height: f32,
    measure: F,
) -> Vec<PositionedLine>
where
    F: Fn(&str) -> f32,
{
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for segment in text.split('\n') {
        for line in wrap_segment(segment.trim(), max_width, &measure) {
            let y_offset = lines.len() as f32 * line_height;
            lines.push(PositionedLine {
                text: line,
                y_offset,
            });
        }
    }
    lines
}

fn wrap_segment<F>(segment: &str, max_width: f32, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut out = Vec::new();
    let mut line = String::new();

    for word in segment.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", line, word);
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            out.push(std::mem::replace(&mut line, word.to_string()));
        }
    }

    out.push(line);
    out
}

/// Lay out the title and description for a canvas.
///
/// Title lines use `title_font_px` as line height, description lines use
/// `desc_font_px * desc_line_height_factor`. The gap between the blocks is
/// only inserted when both have at least one line, so the block height is
/// always `title_lines * title_lh + gap + desc_lines * desc_lh`.
pub fn layout_block(
    title: &str,
    description: &str,
    spec: &CanvasSpec,
    face: &dyn Typeface,
) -> BlockLayout {
    let s = spec.scale();
    let canvas = spec.size_px as f32;

    let max_width = spec.canonical_px as f32 - 2.0 * spec.title_desc_padding_px;
    let title_lh = spec.title_font_px;
    let desc_lh = spec.desc_font_px * spec.desc_line_height_factor;

    let title_lines = layout_paragraph(title, max_width, title_lh, |t| {
        face.measure(t, spec.title_font_px, FontWeight::Bold)
    });
    let desc_lines = layout_paragraph(description, max_width, desc_lh, |t| {
        face.measure(t, spec.desc_font_px, FontWeight::Regular)
    });

    let title_lh_s = title_lh * s;
    let desc_lh_s = desc_lh * s;
    let gap = if !title_lines.is_empty() && !desc_lines.is_empty() {
        spec.block_flow.gap_px() * s
    } else {
        0.0
    };

    let title_height = title_lines.len() as f32 * title_lh_s;
    let desc_height = desc_lines.len() as f32 * desc_lh_s;
    let height = title_height + gap + desc_height;

    let top = match spec.block_flow {
        BlockFlow::FixedTop { top_px, .. } => top_px * s,
        BlockFlow::Centered { .. } => (canvas - height) / 2.0,
    };

    let left = spec.title_desc_padding_px * s;
    let desc_top = top + title_height + gap;

    let place = |lines: Vec<PositionedLine>,
                 origin: f32,
                 font_px: f32,
                 line_height: f32,
                 weight: FontWeight,
                 color: [u8; 4]| {
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| PlacedLine {
                text: line.text,
                x: left,
                y: origin + i as f32 * line_height,
                font_px,
                line_height_px: line_height,
                weight,
                color,
            })
            .collect::<Vec<_>>()
    };

    BlockLayout {
        title: place(
            title_lines,
            top,
            spec.title_font_px * s,
            title_lh_s,
            FontWeight::Bold,
            spec.title_color.0,
        ),
        description: place(
            desc_lines,
            desc_top,
            spec.desc_font_px * s,
            desc_lh_s,
            FontWeight::Regular,
            spec.desc_color.0,
        ),
        top,
        height,
    }
}
