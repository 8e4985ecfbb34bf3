use std::sync::Arc;

use anyhow::Context;
use image::imageops::{self, FilterType};

use crate::foundation::error::{CvError, CvResult};

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode any format known to `image` into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CvResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode a profile photo, cover-crop it to a centered square of `side` pixels and cut it to a
/// circle with an anti-aliased edge.
///
/// `image/svg+xml` photos are parsed with `usvg` and rasterized straight at `side` pixels; any
/// other type goes through the `image` decoders.
pub fn prepare_photo(bytes: &[u8], mime: &str, side: u32) -> CvResult<PreparedImage> {
    if side == 0 {
        return Err(CvError::render("photo size must be at least one pixel"));
    }
    let mut px = if is_svg_mime(mime) {
        rasterize_svg_cover(bytes, side)?
    } else {
        let mut px = decode_cover(bytes, side)?;
        premultiply_rgba8_in_place(&mut px);
        px
    };
    mask_circle_premul_in_place(&mut px, side);

    Ok(PreparedImage {
        width: side,
        height: side,
        rgba8_premul: Arc::new(px),
    })
}

/// `true` for `image/svg+xml` (case-insensitive, parameters ignored).
pub fn is_svg_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("image/svg+xml"))
}

fn decode_cover(bytes: &[u8], side: u32) -> CvResult<Vec<u8>> {
    let dyn_img = image::load_from_memory(bytes).context("decode profile photo")?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(CvError::render("profile photo has no pixels"));
    }

    let crop = w.min(h);
    let square = imageops::crop_imm(&rgba, (w - crop) / 2, (h - crop) / 2, crop, crop).to_image();
    Ok(imageops::resize(&square, side, side, FilterType::Triangle).into_raw())
}

/// Rasterize an SVG so its shorter side fills `side` pixels, centered. Output is premultiplied.
fn rasterize_svg_cover(bytes: &[u8], side: u32) -> CvResult<Vec<u8>> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .context("parse svg profile photo")?;
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(CvError::render("svg profile photo has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(side, side)
        .ok_or_else(|| CvError::render("failed to allocate svg pixmap"))?;
    let target = side as f32;
    let scale = target / w.min(h);
    let xform = resvg::tiny_skia::Transform::from_row(
        scale,
        0.0,
        0.0,
        scale,
        (target - w * scale) / 2.0,
        (target - h * scale) / 2.0,
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn mask_circle_premul_in_place(rgba: &mut [u8], side: u32) {
    let r = f64::from(side) / 2.0;
    for (i, px) in rgba.chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % side) as f64 + 0.5 - r;
        let y = (i as u32 / side) as f64 + 0.5 - r;
        let coverage = (r - (x * x + y * y).sqrt() + 0.5).clamp(0.0, 1.0);
        if coverage < 1.0 {
            for c in px.iter_mut() {
                *c = (f64::from(*c) * coverage).round() as u8;
            }
        }
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
