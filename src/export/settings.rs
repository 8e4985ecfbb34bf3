use crate::{
    export::pdf::A4_WIDTH_MM,
    foundation::error::{CvError, CvResult},
    render::backend::RenderSettings,
};

/// Overrides the supersampling factor.
pub const SCALE_ENV: &str = "CVPRESS_SCALE";
/// Overrides the page width in millimetres.
pub const PAGE_WIDTH_ENV: &str = "CVPRESS_PAGE_WIDTH_MM";

const MAX_SCALE: f32 = 8.0;

/// Settings for one PDF export.
#[derive(Clone, Debug)]
pub struct ExportSettings {
    pub render: RenderSettings,
    /// Page width; the height follows the rendered aspect ratio.
    pub page_width_mm: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            page_width_mm: A4_WIDTH_MM,
        }
    }
}

impl ExportSettings {
    /// Defaults with [`SCALE_ENV`] and [`PAGE_WIDTH_ENV`] applied; unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(SCALE_ENV).ok().as_deref(),
            std::env::var(PAGE_WIDTH_ENV).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, scale: Option<&str>, page_width_mm: Option<&str>) -> Self {
        if let Some(v) = scale.and_then(|v| v.trim().parse::<f32>().ok()) {
            self.render.scale = v;
        }
        if let Some(v) = page_width_mm.and_then(|v| v.trim().parse::<f64>().ok()) {
            self.page_width_mm = v;
        }
        self
    }

    pub fn validate(&self) -> CvResult<()> {
        let scale = self.render.scale;
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_SCALE {
            return Err(CvError::validation(format!(
                "scale must be in (0, {MAX_SCALE}], got {scale}"
            )));
        }
        if !self.page_width_mm.is_finite() || self.page_width_mm <= 0.0 {
            return Err(CvError::validation(format!(
                "page width must be finite and > 0, got {}",
                self.page_width_mm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/settings.rs"]
mod tests;
