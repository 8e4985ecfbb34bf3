pub(crate) mod photo;
pub(crate) mod record;
pub(crate) mod state;
