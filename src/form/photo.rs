use std::path::Path;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{CvError, CvResult};

const FALLBACK_MIME: &str = "application/octet-stream";
const SVG_MIME: &str = "image/svg+xml";

/// A file selected for upload: declared MIME type plus raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    /// Declared MIME type, e.g. `image/png`.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Original file name, if known.
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
            file_name: None,
        }
    }

    /// Read a file from disk, declaring its MIME type from the extension.
    pub fn from_path(path: &Path) -> CvResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read upload '{}'", path.display()))?;
        let is_svg = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let mime = if is_svg {
            SVG_MIME.to_string()
        } else {
            image::ImageFormat::from_path(path)
                .map(|f| f.to_mime_type().to_string())
                .unwrap_or_else(|_| FALLBACK_MIME.to_string())
        };
        Ok(Self {
            mime,
            bytes,
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        })
    }

    /// `true` when the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime)
    }
}

/// `true` for `image/*` MIME types (case-insensitive, parameters ignored).
pub fn is_image_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some((kind, sub)) => kind.eq_ignore_ascii_case("image") && !sub.is_empty(),
        None => false,
    }
}

/// Profile photo carried as a `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImage {
    data_uri: String,
}

impl ProfileImage {
    /// Encode an accepted upload as a base64 data URI.
    pub fn from_upload(upload: &ImageUpload) -> CvResult<Self> {
        if !upload.is_image() {
            return Err(CvError::validation(format!(
                "'{}' is not an image type",
                upload.mime
            )));
        }
        let payload = base64::engine::general_purpose::STANDARD.encode(&upload.bytes);
        Ok(Self {
            data_uri: format!("data:{};base64,{payload}", upload.mime.trim()),
        })
    }

    /// Wrap an existing data URI after checking its header.
    pub fn from_data_uri(uri: impl Into<String>) -> CvResult<Self> {
        let image = Self {
            data_uri: uri.into(),
        };
        let (mime, _) = image.split()?;
        if !is_image_mime(mime) {
            return Err(CvError::validation(format!(
                "data URI type '{mime}' is not an image type"
            )));
        }
        Ok(image)
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// MIME type declared in the data URI header.
    pub fn mime(&self) -> &str {
        self.split().map(|(m, _)| m).unwrap_or(FALLBACK_MIME)
    }

    /// Decode the base64 payload back into the original bytes.
    pub fn bytes(&self) -> CvResult<Vec<u8>> {
        let (_, payload) = self.split()?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .context("decode profile image payload")
            .map_err(CvError::from)
    }

    fn split(&self) -> CvResult<(&str, &str)> {
        let rest = self
            .data_uri
            .strip_prefix("data:")
            .ok_or_else(|| CvError::validation("profile image is not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CvError::validation("data URI has no payload"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| CvError::validation("data URI payload must be base64"))?;
        Ok((mime, payload))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/photo.rs"]
mod tests;
