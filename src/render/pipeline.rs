use crate::{
    assets::text::TextShaper,
    composition::model::Composition,
    foundation::error::CvResult,
    layout::solver::layout_composition,
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::cpu::CpuBackend,
};

/// Lay out `comp` with `shaper`, then draw it with a fresh [`CpuBackend`].
///
/// The frame holds **premultiplied** RGBA8 at `settings.scale` device pixels per logical pixel.
#[tracing::instrument(skip(comp, shaper, settings), fields(template = %comp.template, scale = settings.scale))]
pub fn rasterize(
    comp: &Composition,
    shaper: &mut dyn TextShaper,
    settings: &RenderSettings,
) -> CvResult<FrameRGBA> {
    let plan = layout_composition(comp, shaper)?;
    let mut backend = CpuBackend::new(settings.clone());
    let frame = backend.render_plan(&plan)?;
    tracing::debug!(width = frame.width, height = frame.height, "rasterized");
    Ok(frame)
}
