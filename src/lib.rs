//! cvpress builds one-page résumés.
//!
//! The flow mirrors a form-driven builder:
//!
//! - Edit a [`FormState`] (fields, profile photo, template choice)
//! - Preview it as a [`Composition`] through one of five data-driven templates
//! - Export: lay out, rasterize on the CPU at 2x, and wrap the bitmap in a single-page PDF
//!   named `{first}_{last}_CV.pdf`
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod composition;
pub(crate) mod export;
pub(crate) mod form;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod template;

pub use crate::foundation::core::{
    Affine, BezPath, Edges, MM_PER_PT, Point, Rect, Rgba8, Rgba8Premul, Vec2, mm_to_pt,
};
pub use crate::foundation::error::{CvError, CvResult};

pub use crate::assets::decode::{PreparedImage, decode_image, is_svg_mime, prepare_photo};
pub use crate::assets::fonts::{FONT_DIR_ENV, FaceKey, FontFace, FontSet};
pub use crate::assets::text::{
    FixedAdvanceShaper, Glyph, GlyphRun, ParleyShaper, ShapedText, TextShaper,
};
pub use crate::composition::model::{
    Align, Border, BoxStyle, Composition, ContactKind, ImageSpec, Justify, Length, Node, NodeKind,
    Role, SectionKind, ShapeSpec, Span, TextSpec,
};
pub use crate::export::pdf::{A4_WIDTH_MM, PageGeometry, assemble_pdf};
pub use crate::export::pipeline::{ExportOutcome, export_filename, export_pdf};
pub use crate::export::settings::{ExportSettings, PAGE_WIDTH_ENV, SCALE_ENV};
pub use crate::form::photo::{ImageUpload, ProfileImage, is_image_mime};
pub use crate::form::record::{Field, ResumeRecord, parse_skills, text_lines};
pub use crate::form::state::{ExportGuard, FormState};
pub use crate::layout::solver::layout_composition;
pub use crate::render::backend::{DEFAULT_SCALE, FrameRGBA, RenderBackend, RenderSettings};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::rasterize;
pub use crate::render::plan::{DrawOp, RenderPlan};
pub use crate::template::descriptor::{FontKind, LayoutDescriptor, TemplateId};
pub use crate::template::render::render_composition;
