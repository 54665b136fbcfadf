//! The asset registry plus its load and session document formats.

pub(crate) mod manifest;
pub(crate) mod session;
pub(crate) mod store;
