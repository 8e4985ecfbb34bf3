use std::cell::Cell;

use crate::{
    composition::model::Composition,
    form::photo::{ImageUpload, ProfileImage},
    form::record::{Field, ResumeRecord},
    foundation::error::{CvError, CvResult},
    template::{descriptor::TemplateId, render::render_composition},
};

/// Mutable form state: record, profile photo, selected template and the export busy flag.
///
/// Every edit is synchronous and last-write-wins. `revision` increases on each accepted change so
/// callers can tell when the preview is stale.
#[derive(Debug, Default)]
pub struct FormState {
    record: ResumeRecord,
    photo: Option<ProfileImage>,
    template: TemplateId,
    revision: u64,
    exporting: Cell<bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record (for example one loaded from JSON).
    pub fn with_record(record: ResumeRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn photo(&self) -> Option<&ProfileImage> {
        self.photo.as_ref()
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace one field's value.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.record.set(field, value);
        self.revision += 1;
    }

    /// Replace the profile photo with `upload` when it declares an image type.
    ///
    /// Non-image uploads are ignored: the current photo stays in place and `false` is returned.
    pub fn update_image(&mut self, upload: &ImageUpload) -> bool {
        match ProfileImage::from_upload(upload) {
            Ok(photo) => {
                self.photo = Some(photo);
                self.revision += 1;
                true
            }
            Err(err) => {
                tracing::debug!(mime = %upload.mime, file = ?upload.file_name, %err, "upload ignored");
                false
            }
        }
    }

    pub fn clear_image(&mut self) {
        if self.photo.take().is_some() {
            self.revision += 1;
        }
    }

    /// Switch templates; the record and photo are untouched.
    pub fn select_template(&mut self, template: TemplateId) {
        if self.template != template {
            self.template = template;
            self.revision += 1;
        }
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.record.is_blank(*f))
            .collect()
    }

    pub fn names_present(&self) -> bool {
        !self.record.is_blank(Field::FirstName) && !self.record.is_blank(Field::LastName)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.get()
    }

    /// `true` when both names are filled in and no export is running.
    pub fn can_export(&self) -> bool {
        self.names_present() && !self.is_exporting()
    }

    /// Mark an export as running until the returned guard is dropped.
    pub fn begin_export(&self) -> CvResult<ExportGuard<'_>> {
        if self.exporting.get() {
            return Err(CvError::validation("an export is already in progress"));
        }
        if !self.names_present() {
            return Err(CvError::validation(
                "first name and last name are required to export",
            ));
        }
        self.exporting.set(true);
        Ok(ExportGuard {
            flag: &self.exporting,
        })
    }

    /// Composition for the current record, photo and template.
    pub fn preview(&self) -> Composition {
        render_composition(&self.record, self.photo.as_ref(), self.template)
    }
}

/// Holds the export busy flag; clears it on drop.
#[derive(Debug)]
#[must_use = "the export is marked finished as soon as the guard is dropped"]
pub struct ExportGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/state.rs"]
mod tests;
