use std::io::Cursor;

use image::{ExtendedColorType, ImageEncoder as _, ImageFormat};

use crate::foundation::{
    config::DEFAULT_JPEG_QUALITY,
    core::MediaKind,
    error::{ModkitError, ModkitResult},
};

/// Largest width or height accepted for generated or resized images (JPEG's hard limit).
pub const MAX_DIMENSION: u32 = 65_535;

/// Largest pixel count accepted for generated or resized images (256 MiB of RGBA8).
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Byte length of a `width x height` RGBA8 buffer, or [`ModkitError::InvalidDimensions`] when a
/// side is zero or the image exceeds [`MAX_DIMENSION`] / [`MAX_PIXELS`].
pub fn checked_buffer_len(width: u32, height: u32) -> ModkitResult<usize> {
    if width == 0 || height == 0 {
        return Err(ModkitError::invalid_dimensions(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ModkitError::invalid_dimensions(format!(
            "{width}x{height} exceeds the {MAX_DIMENSION} pixel side limit"
        )));
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(ModkitError::invalid_dimensions(format!(
            "{width}x{height} exceeds the {MAX_PIXELS} pixel budget"
        )));
    }
    usize::try_from(pixels)
        .ok()
        .and_then(|p| p.checked_mul(4))
        .ok_or_else(|| ModkitError::invalid_dimensions(format!("{width}x{height} is too large")))
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in straight-alpha RGBA8.
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major RGBA8, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an existing RGBA8 buffer, checking its length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> ModkitResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(ModkitError::invalid_dimensions(format!(
                "{width}x{height} RGBA8 needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Decode encoded image bytes into straight-alpha RGBA8.
///
/// The container is sniffed from the bytes; `kind` is only the fallback when sniffing fails, so a
/// PNG stored under a `.jpg` name still decodes.
pub fn decode_raster(bytes: &[u8], kind: MediaKind) -> ModkitResult<RasterImage> {
    let hint = image_format(kind)?;
    let format = image::guess_format(bytes).unwrap_or(hint);
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ModkitError::decode(format!("decode {kind} image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RasterImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Encode an image as `kind`.
///
/// `quality` (1..=100) only applies to JPEG and defaults to [`DEFAULT_JPEG_QUALITY`]. JPEG has no
/// alpha channel, so alpha is dropped there.
pub fn encode_raster(
    image: &RasterImage,
    kind: MediaKind,
    quality: Option<u8>,
) -> ModkitResult<Vec<u8>> {
    if image.width == 0 || image.height == 0 {
        return Err(ModkitError::invalid_dimensions(format!(
            "cannot encode {}x{} image",
            image.width, image.height
        )));
    }
    if image.pixels.len() != image.pixel_count() * 4 {
        return Err(ModkitError::invalid_dimensions(format!(
            "pixel buffer length {} does not match {}x{}",
            image.pixels.len(),
            image.width,
            image.height
        )));
    }

    let mut buf = Vec::new();
    match kind {
        MediaKind::Jpeg => {
            let quality = quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
            let rgb = rgba_to_rgb(&image.pixels);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
                .encode(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
                .map_err(|e| ModkitError::encode(format!("encode jpeg: {e}")))?;
        }
        MediaKind::Png => {
            image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
                .write_image(
                    &image.pixels,
                    image.width,
                    image.height,
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| ModkitError::encode(format!("encode png: {e}")))?;
        }
        MediaKind::Mp3 => {
            return Err(ModkitError::kind_mismatch(
                "cannot encode a raster image as mp3",
            ));
        }
    }
    Ok(buf)
}

fn image_format(kind: MediaKind) -> ModkitResult<ImageFormat> {
    match kind {
        MediaKind::Jpeg => Ok(ImageFormat::Jpeg),
        MediaKind::Png => Ok(ImageFormat::Png),
        MediaKind::Mp3 => Err(ModkitError::kind_mismatch(
            "mp3 assets cannot be decoded as images",
        )),
    }
}

fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/codec/raster.rs"]
mod tests;
