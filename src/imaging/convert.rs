use image::imageops::FilterType;

use crate::{
    codec::raster::{RasterImage, checked_buffer_len, encode_raster},
    foundation::{
        core::MediaKind,
        error::{ModkitError, ModkitResult},
    },
};

/// Resolve requested output dimensions against the source size.
///
/// With one dimension given the other follows the source aspect ratio; with none the source size
/// is kept. Requested sizes beyond [`MAX_DIMENSION`](crate::MAX_DIMENSION) or
/// [`MAX_PIXELS`](crate::MAX_PIXELS) are [`ModkitError::InvalidDimensions`].
pub fn target_dimensions(
    src_width: u32,
    src_height: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> ModkitResult<(u32, u32)> {
    if width == Some(0) || height == Some(0) {
        return Err(ModkitError::invalid_dimensions(format!(
            "target dimensions must be positive, got {width:?}x{height:?}"
        )));
    }
    if src_width == 0 || src_height == 0 {
        return Err(ModkitError::invalid_dimensions(format!(
            "source image is {src_width}x{src_height}"
        )));
    }
    let scaled = |other: u32, given: u32, given_orig: u32| -> u32 {
        let v = (f64::from(other) * f64::from(given) / f64::from(given_orig)).round();
        (v as u32).max(1)
    };
    let dims = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scaled(src_height, w, src_width)),
        (None, Some(h)) => (scaled(src_width, h, src_height), h),
        (None, None) => return Ok((src_width, src_height)),
    };
    checked_buffer_len(dims.0, dims.1)?;
    Ok(dims)
}

/// Nearest-neighbour stretch to `width x height`. Returns a clone when the size already matches.
pub fn resize_image(image: &RasterImage, width: u32, height: u32) -> ModkitResult<RasterImage> {
    if image.width == width && image.height == height && width > 0 && height > 0 {
        return Ok(image.clone());
    }
    checked_buffer_len(width, height)?;
    let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
        image.width,
        image.height,
        image.pixels.as_slice(),
    )
    .ok_or_else(|| {
        ModkitError::invalid_dimensions(format!(
            "pixel buffer does not match {}x{}",
            image.width, image.height
        ))
    })?;
    let resized = image::imageops::resize(&src, width, height, FilterType::Nearest);
    Ok(RasterImage {
        width,
        height,
        pixels: resized.into_raw(),
    })
}

/// Optionally resize, then encode as `target_kind`.
pub fn convert_format(
    image: &RasterImage,
    target_kind: MediaKind,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u8>,
) -> ModkitResult<Vec<u8>> {
    if !target_kind.is_raster() {
        return Err(ModkitError::kind_mismatch(format!(
            "cannot convert an image to {target_kind}"
        )));
    }
    let (w, h) = target_dimensions(image.width, image.height, width, height)?;
    let resized = resize_image(image, w, h)?;
    encode_raster(&resized, target_kind, quality)
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/convert.rs"]
mod tests;
