//! Byte-level adapters: base64 text, raster images, PCM audio and MP3 output.

pub(crate) mod audio;
pub(crate) mod mp3;
pub(crate) mod raster;
pub(crate) mod text;
