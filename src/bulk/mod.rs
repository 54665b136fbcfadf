//! Batch transforms over the current selection.

pub(crate) mod ops;
pub(crate) mod orchestrator;
