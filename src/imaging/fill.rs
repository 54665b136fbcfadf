use crate::{
    codec::raster::{RasterImage, checked_buffer_len},
    foundation::{core::Rgba8, error::ModkitResult},
};

/// Image of `width x height` where every pixel is `color`.
///
/// Zero or oversized dimensions are [`ModkitError::InvalidDimensions`](crate::ModkitError).
pub fn generate_solid_fill(color: Rgba8, width: u32, height: u32) -> ModkitResult<RasterImage> {
    let len = checked_buffer_len(width, height)?;
    Ok(RasterImage {
        width,
        height,
        pixels: color.to_array().repeat(len / 4),
    })
}

/// Mix every pixel's RGB towards `target` by `strength`.
///
/// `strength` is clamped to [0, 1]; `0` returns the input, `1` paints every pixel `target`.
/// Alpha is preserved so transparent texture regions stay transparent.
pub fn blend_color(image: &RasterImage, target: Rgba8, strength: f32) -> RasterImage {
    let s = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    };
    let inv = 1.0 - s;
    let t = [f32::from(target.r), f32::from(target.g), f32::from(target.b)];

    let mut out = Vec::with_capacity(image.pixels.len());
    for px in image.pixels.chunks_exact(4) {
        for (c, tc) in px[..3].iter().zip(t) {
            out.push((f32::from(*c) * inv + tc * s).round() as u8);
        }
        out.push(px[3]);
    }
    RasterImage {
        width: image.width,
        height: image.height,
        pixels: out,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/fill.rs"]
mod tests;
