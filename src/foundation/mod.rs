//! Shared identity types, error taxonomy and configuration.

pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod error;
