use std::{borrow::Cow, collections::HashMap, sync::Arc};

use crate::{
    assets::fonts::{FaceKey, FontFace, FontSet},
    composition::model::{Align, TextSpec},
    foundation::core::Rgba8,
    foundation::error::{CvError, CvResult},
};

/// Measures and positions paragraphs for the layout solver.
pub trait TextShaper {
    /// Shape `spec`, breaking lines at `max_width` when given.
    ///
    /// With a `max_width`, centered paragraphs are centered inside it.
    fn shape(&mut self, spec: &TextSpec, max_width: Option<f64>) -> CvResult<ShapedText>;
}

/// A shaped paragraph; glyph positions are relative to its top-left corner.
#[derive(Clone, Debug, Default)]
pub struct ShapedText {
    /// Widest line advance.
    pub width: f64,
    /// Total height of all lines.
    pub height: f64,
    pub runs: Vec<Arc<GlyphRun>>,
}

/// Glyphs sharing one face, size and color.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub face: FaceKey,
    pub font: Arc<FontFace>,
    pub font_size: f32,
    pub color: Rgba8,
    pub glyphs: Vec<Glyph>,
}

/// Positioned glyph; `y` is the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

impl From<TextBrushRgba8> for Rgba8 {
    fn from(b: TextBrushRgba8) -> Self {
        Self {
            r: b.r,
            g: b.g,
            b: b.b,
            a: b.a,
        }
    }
}

struct FaceEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
    face: Arc<FontFace>,
}

impl FaceEngine {
    fn new(face: Arc<FontFace>) -> CvResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.to_vec()), None);
        let names: Vec<String> = families
            .iter()
            .filter_map(|(id, _)| font_ctx.collection.family_name(*id).map(str::to_string))
            .collect();
        let family = names
            .iter()
            .find(|n| **n == face.family)
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| CvError::render("no font families registered from font bytes"))?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            face,
        })
    }
}

/// [`TextShaper`] backed by Parley, one font context per face.
pub struct ParleyShaper {
    fonts: FontSet,
    engines: HashMap<FaceKey, FaceEngine>,
}

impl ParleyShaper {
    pub fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            engines: HashMap::new(),
        }
    }

    fn engine(&mut self, key: FaceKey) -> CvResult<&mut FaceEngine> {
        if !self.engines.contains_key(&key) {
            let engine = FaceEngine::new(self.fonts.face(key)?)?;
            self.engines.insert(key, engine);
        }
        self.engines
            .get_mut(&key)
            .ok_or_else(|| CvError::render("text engine missing after insert"))
    }
}

impl TextShaper for ParleyShaper {
    fn shape(&mut self, spec: &TextSpec, max_width: Option<f64>) -> CvResult<ShapedText> {
        if !spec.size.is_finite() || spec.size <= 0.0 {
            return Err(CvError::render("text size must be finite and > 0"));
        }
        let key = FaceKey::new(spec.font, spec.bold);
        let text = spec.text();
        let engine = self.engine(key)?;

        let mut builder = engine
            .layout_ctx
            .ranged_builder(&mut engine.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(engine.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size));
        if spec.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        let mut start = 0;
        for span in &spec.spans {
            let end = start + span.text.len();
            builder.push(
                parley::style::StyleProperty::Brush(TextBrushRgba8::from(span.color)),
                start..end,
            );
            start = end;
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&text);
        let max = max_width.map(|w| w as f32);
        layout.break_all_lines(max);
        layout.align(
            max,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut runs = Vec::new();
        for line in layout.lines() {
            let dx = match (spec.align, max) {
                (Align::Center, Some(w)) => ((w - line.metrics().advance) / 2.0).max(0.0),
                _ => 0.0,
            };
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| Glyph {
                        id: g.id,
                        x: g.x + dx,
                        y: g.y,
                    })
                    .collect();
                runs.push(Arc::new(GlyphRun {
                    face: key,
                    font: engine.face.clone(),
                    font_size: run.run().font_size(),
                    color: run.style().brush.into(),
                    glyphs,
                }));
            }
        }

        Ok(ShapedText {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            runs,
        })
    }
}

/// Deterministic shaper: every character advances by a fixed fraction of the font size.
///
/// Produces geometry only (no glyphs), so layouts can be computed without any font files.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvanceShaper {
    /// Advance per character, in ems.
    pub advance_em: f64,
    /// Line height, in ems.
    pub line_height_em: f64,
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            line_height_em: 1.25,
        }
    }
}

impl FixedAdvanceShaper {
    fn wrap(&self, paragraph: &str, advance: f64, max_width: Option<f64>) -> Vec<f64> {
        let width_of = |chars: usize| chars as f64 * advance;
        let Some(max) = max_width else {
            return vec![width_of(paragraph.chars().count())];
        };
        let mut lines = Vec::new();
        let mut current = 0usize;
        for word in paragraph.split(' ') {
            let len = word.chars().count();
            if current > 0 && width_of(current + 1 + len) > max {
                lines.push(width_of(current));
                current = len;
            } else if current > 0 {
                current += 1 + len;
            } else {
                current = len;
            }
        }
        lines.push(width_of(current));
        lines
    }
}

impl TextShaper for FixedAdvanceShaper {
    fn shape(&mut self, spec: &TextSpec, max_width: Option<f64>) -> CvResult<ShapedText> {
        if !spec.size.is_finite() || spec.size <= 0.0 {
            return Err(CvError::render("text size must be finite and > 0"));
        }
        let size = f64::from(spec.size);
        let text = spec.text();
        let lines: Vec<f64> = text
            .split('\n')
            .flat_map(|p| self.wrap(p, size * self.advance_em, max_width))
            .collect();
        Ok(ShapedText {
            width: lines.iter().copied().fold(0.0, f64::max),
            height: lines.len() as f64 * size * self.line_height_em,
            runs: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
