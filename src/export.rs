pub(crate) mod pdf;
pub(crate) mod pipeline;
pub(crate) mod settings;
