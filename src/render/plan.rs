use std::sync::Arc;

use crate::{
    assets::text::GlyphRun,
    form::photo::ProfileImage,
    foundation::core::{Point, Rect, Rgba8, Vec2},
};

/// Absolutely positioned drawing for one composition, in logical pixels.
///
/// Operations are painted in order over `background`.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub width: f64,
    /// Content height; the page is exactly as tall as its content.
    pub height: f64,
    pub background: Rgba8,
    pub ops: Vec<DrawOp>,
}

/// A single drawing primitive.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Solid rectangle, optionally with rounded corners.
    FillRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    /// The profile photo, cover-cropped and masked to a circle inscribed in `rect`.
    Image { rect: Rect, source: ProfileImage },
    /// Shaped text; glyph positions are relative to `origin`.
    Glyphs { run: Arc<GlyphRun>, origin: Point },
}

impl DrawOp {
    /// Same primitive moved by `by`.
    pub fn translate(self, by: Vec2) -> Self {
        match self {
            DrawOp::FillRect {
                rect,
                radius,
                color,
            } => DrawOp::FillRect {
                rect: rect + by,
                radius,
                color,
            },
            DrawOp::Image { rect, source } => DrawOp::Image {
                rect: rect + by,
                source,
            },
            DrawOp::Glyphs { run, origin } => DrawOp::Glyphs {
                run,
                origin: origin + by,
            },
        }
    }
}

impl RenderPlan {
    /// Painted area of every solid rectangle of `color`.
    pub fn rects_of(&self, color: Rgba8) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color: c, .. } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }
}
