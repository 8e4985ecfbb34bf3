use std::{collections::HashMap, sync::Arc};

use kurbo::Shape;

use crate::{
    assets::decode::{PreparedImage, prepare_photo},
    assets::fonts::{FaceKey, FontFace},
    foundation::core::{Affine, BezPath, Point, Rect, Rgba8},
    foundation::error::{CvError, CvResult},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::plan::{DrawOp, RenderPlan},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PhotoKey {
    data_uri: String,
    side: u32,
}

/// CPU raster backend powered by `vello_cpu`.
pub struct CpuBackend {
    settings: RenderSettings,
    photo_cache: HashMap<PhotoKey, vello_cpu::Image>,
    font_cache: HashMap<FaceKey, vello_cpu::peniko::FontData>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            photo_cache: HashMap::new(),
            font_cache: HashMap::new(),
        }
    }

    fn photo_paint_for(
        &mut self,
        data_uri: &str,
        mime: &str,
        side: u32,
        bytes: impl FnOnce() -> CvResult<Vec<u8>>,
    ) -> CvResult<vello_cpu::Image> {
        let key = PhotoKey {
            data_uri: data_uri.to_string(),
            side,
        };
        if let Some(paint) = self.photo_cache.get(&key) {
            return Ok(paint.clone());
        }

        let prepared = prepare_photo(&bytes()?, mime, side)?;
        let paint = image_paint(&prepared)?;
        self.photo_cache.insert(key, paint.clone());
        Ok(paint)
    }

    fn font_for(&mut self, key: FaceKey, face: &FontFace) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                )
            })
            .clone()
    }
}

impl RenderBackend for CpuBackend {
    fn render_plan(&mut self, plan: &RenderPlan) -> CvResult<FrameRGBA> {
        let scale = f64::from(self.settings.scale);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CvError::render("render scale must be finite and > 0"));
        }
        let scale = fit_scale(plan, scale);
        let width = device_extent(plan.width, scale, "width")?;
        let height = device_extent(plan.height, scale, "height")?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let clear = self
            .settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8 { r, g, b, a }.to_premul())
            .map(|c| [c.r, c.g, c.b, c.a])
            .unwrap_or([0, 0, 0, 0]);
        clear_pixmap(&mut pixmap, clear);

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let page = Affine::scale(scale);
        fill(
            &mut ctx,
            page,
            Rect::new(0.0, 0.0, plan.width, plan.height),
            0.0,
            plan.background,
        );
        for op in &plan.ops {
            self.draw_op(&mut ctx, page, scale, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        page: Affine,
        scale: f64,
        op: &DrawOp,
    ) -> CvResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect {
                rect,
                radius,
                color,
            } => {
                fill(ctx, page, *rect, *radius, *color);
                Ok(())
            }
            DrawOp::Image { rect, source } => {
                // Photos are resampled at device resolution and drawn unscaled.
                let side = (rect.width().min(rect.height()) * scale).round().max(1.0) as u32;
                let paint =
                    self.photo_paint_for(source.data_uri(), source.mime(), side, || {
                        source.bytes()
                    })?;
                let origin = page * rect.origin();
                ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(side),
                    f64::from(side),
                ));
                Ok(())
            }
            DrawOp::Glyphs { run, origin } => {
                let font = self.font_for(run.face, &run.font);
                ctx.set_transform(affine_to_cpu(page * Affine::translate(origin.to_vec2())));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    run.color.r,
                    run.color.g,
                    run.color.b,
                    run.color.a,
                ));
                let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.font_size)
                    .fill_glyphs(glyphs);
                Ok(())
            }
        }
    }
}

fn fill(ctx: &mut vello_cpu::RenderContext, page: Affine, rect: Rect, radius: f64, color: Rgba8) {
    ctx.set_transform(affine_to_cpu(page));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    let radius = radius.min(rect.width().min(rect.height()) / 2.0);
    if radius > 0.0 {
        let path = rect.to_rounded_rect(radius).to_path(0.1);
        ctx.fill_path(&bezpath_to_cpu(&path));
    } else {
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }
}

/// Largest scale not above `scale` at which the page still fits a `u16` pixmap.
fn fit_scale(plan: &RenderPlan, scale: f64) -> f64 {
    let longest = plan.width.max(plan.height);
    let limit = f64::from(u16::MAX - 1) / longest;
    if longest.is_finite() && longest > 0.0 && longest * scale > f64::from(u16::MAX) {
        tracing::warn!(requested = scale, used = limit, "page too tall for the requested scale");
        return limit;
    }
    scale
}

fn device_extent(logical: f64, scale: f64, what: &str) -> CvResult<u16> {
    let px = (logical * scale).ceil();
    if !px.is_finite() || px < 1.0 {
        return Err(CvError::render(format!("page {what} is empty")));
    }
    if px > f64::from(u16::MAX) {
        return Err(CvError::render(format!(
            "page {what} of {px} px exceeds the raster limit"
        )));
    }
    Ok(px as u16)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_paint(img: &PreparedImage) -> CvResult<vello_cpu::Image> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| CvError::render("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| CvError::render("image height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(CvError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(img.width as usize * img.height as usize);
    for px in img.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
