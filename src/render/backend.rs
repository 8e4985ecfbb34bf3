use crate::{foundation::error::CvResult, render::plan::RenderPlan};

/// Default supersampling factor: two device pixels per logical pixel.
pub const DEFAULT_SCALE: f32 = 2.0;

/// A rendered page as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this explicit
/// at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels with straight alpha, suitable for PNG encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// A renderer that can execute a [`RenderPlan`] into a [`FrameRGBA`].
pub trait RenderBackend {
    fn render_plan(&mut self, plan: &RenderPlan) -> CvResult<FrameRGBA>;
}

/// Rasterization settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Device pixels per logical pixel.
    pub scale: f32,
    /// If set, backends clear the target to this RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            clear_rgba: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
