use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::text::TextShaper,
    export::pdf::{PageGeometry, assemble_pdf},
    export::settings::ExportSettings,
    form::record::{Field, ResumeRecord},
    form::state::FormState,
    foundation::error::{CvError, CvResult},
    render::pipeline::rasterize,
};

/// What a successful export produced.
#[derive(Clone, Debug)]
pub struct ExportOutcome {
    /// Written PDF.
    pub path: PathBuf,
    pub page: PageGeometry,
    /// Raster size in device pixels.
    pub pixel_size: (u32, u32),
    /// PDF size in bytes.
    pub bytes: usize,
}

/// `{first}_{last}_CV.pdf` for the record's names.
///
/// Names are trimmed and path separators replaced by `_`. Blank names are a validation error.
pub fn export_filename(record: &ResumeRecord) -> CvResult<String> {
    let first = file_component(record.get(Field::FirstName));
    let last = file_component(record.get(Field::LastName));
    if first.is_empty() || last.is_empty() {
        return Err(CvError::validation(
            "first name and last name are required to export",
        ));
    }
    Ok(format!("{first}_{last}_CV.pdf"))
}

fn file_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Rasterize the current preview and write it as a single-page PDF into `out_dir`.
///
/// The state's busy flag is held for the whole call. Bytes go to a `.partial` sibling that is
/// renamed on success and removed on failure, so a failed export leaves no file behind.
#[tracing::instrument(skip(state, shaper, settings), fields(template = %state.template()))]
pub fn export_pdf(
    state: &FormState,
    shaper: &mut dyn TextShaper,
    settings: &ExportSettings,
    out_dir: &Path,
) -> CvResult<ExportOutcome> {
    let _guard = state.begin_export()?;
    let result = run_export(state, shaper, settings, out_dir);
    match &result {
        Ok(outcome) => tracing::info!(
            path = %outcome.path.display(),
            width_mm = outcome.page.width_mm,
            height_mm = outcome.page.height_mm,
            bytes = outcome.bytes,
            "exported"
        ),
        Err(err) => tracing::error!(%err, "export failed"),
    }
    result
}

fn run_export(
    state: &FormState,
    shaper: &mut dyn TextShaper,
    settings: &ExportSettings,
    out_dir: &Path,
) -> CvResult<ExportOutcome> {
    settings.validate()?;
    let path = out_dir.join(export_filename(state.record())?);

    let frame = rasterize(&state.preview(), shaper, &settings.render)?;
    let page = PageGeometry::fit(frame.width, frame.height, settings.page_width_mm)?;
    let pdf = assemble_pdf(&frame, &page)?;
    write_replacing(&path, &pdf)?;

    Ok(ExportOutcome {
        path,
        page,
        pixel_size: (frame.width, frame.height),
        bytes: pdf.len(),
    })
}

fn write_replacing(path: &Path, bytes: &[u8]) -> CvResult<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let written = std::fs::write(&partial, bytes)
        .with_context(|| format!("write '{}'", partial.display()))
        .and_then(|()| {
            std::fs::rename(&partial, path)
                .with_context(|| format!("move export into '{}'", path.display()))
        });
    if written.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    Ok(written?)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
