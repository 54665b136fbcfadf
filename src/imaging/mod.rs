//! Pixel transforms over decoded [`RasterImage`](crate::RasterImage)s.
//!
//! Every transform reads its input buffer and writes a fresh output buffer.

pub(crate) mod adjust;
pub(crate) mod convert;
pub(crate) mod fill;
