/// Convenience result type used across cvpress.
pub type CvResult<T> = Result<T, CvError>;

/// Top-level error taxonomy used by the builder and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum CvError {
    /// Invalid user-provided data or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while laying out or rasterizing a composition.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while assembling or saving the exported document.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CvError {
    /// Build a [`CvError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CvError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CvError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`CvError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CvError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
