use super::*;
use crate::{
    codec::raster::{MAX_DIMENSION, RasterImage},
    foundation::error::ModkitError,
};

#[test]
fn solid_fill_has_requested_size_and_color() {
    let color = Rgba8 {
        r: 1,
        g: 2,
        b: 3,
        a: 4,
    };
    let img = generate_solid_fill(color, 3, 2).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(img.pixels.len(), 24);
    assert!(img.pixels.chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
}

#[test]
fn solid_fill_rejects_zero_dimensions() {
    let black = Rgba8::rgb(0, 0, 0);
    assert!(matches!(
        generate_solid_fill(black, 0, 4),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert!(generate_solid_fill(black, 4, 0).is_err());
}

#[test]
fn blend_endpoints_and_midpoint() {
    let img = RasterImage::from_rgba8(2, 1, vec![0, 100, 200, 50, 255, 255, 255, 0]).unwrap();
    let target = Rgba8::rgb(100, 0, 0);

    assert_eq!(blend_color(&img, target, 0.0), img);

    let full = blend_color(&img, target, 1.0);
    assert_eq!(full.pixels, vec![100, 0, 0, 50, 100, 0, 0, 0]);

    let half = blend_color(&img, target, 0.5);
    assert_eq!(&half.pixels[..4], &[50, 50, 100, 50]);
}

#[test]
fn blend_strength_is_clamped() {
    let img = RasterImage::from_rgba8(1, 1, vec![10, 20, 30, 255]).unwrap();
    let target = Rgba8::rgb(200, 200, 200);
    assert_eq!(blend_color(&img, target, 5.0), blend_color(&img, target, 1.0));
    assert_eq!(blend_color(&img, target, -1.0), img);
    assert_eq!(blend_color(&img, target, f32::NAN), img);
}

#[test]
fn solid_fill_rejects_oversized_dimensions() {
    let white = Rgba8::rgb(255, 255, 255);
    for (w, h) in [
        (u32::MAX, u32::MAX),
        (u32::MAX, 1),
        (MAX_DIMENSION + 1, 1),
        (MAX_DIMENSION, MAX_DIMENSION),
    ] {
        assert!(
            matches!(
                generate_solid_fill(white, w, h),
                Err(ModkitError::InvalidDimensions(_))
            ),
            "{w}x{h}"
        );
    }
    let wide = generate_solid_fill(white, MAX_DIMENSION, 1).unwrap();
    assert_eq!(wide.pixels.len(), MAX_DIMENSION as usize * 4);
}
