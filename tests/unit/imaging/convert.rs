use super::*;
use crate::codec::raster::{MAX_DIMENSION, decode_raster};

fn gradient(width: u32, height: u32) -> RasterImage {
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 0, 255]);
        }
    }
    RasterImage::from_rgba8(width, height, pixels).unwrap()
}

#[test]
fn one_dimension_keeps_aspect_ratio() {
    assert_eq!(target_dimensions(200, 100, Some(50), None).unwrap(), (50, 25));
    assert_eq!(target_dimensions(200, 100, None, Some(50)).unwrap(), (100, 50));
    assert_eq!(target_dimensions(200, 100, None, None).unwrap(), (200, 100));
    assert_eq!(target_dimensions(200, 100, Some(7), Some(9)).unwrap(), (7, 9));
    assert_eq!(target_dimensions(1000, 1, Some(10), None).unwrap(), (10, 1));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(matches!(
        target_dimensions(10, 10, Some(0), None),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert!(resize_image(&gradient(2, 2), 0, 3).is_err());
}

#[test]
fn nearest_resize_stretches_pixels() {
    let img = gradient(2, 1);
    let out = resize_image(&img, 4, 2).unwrap();
    assert_eq!((out.width, out.height), (4, 2));
    assert_eq!(&out.pixels[..4], &img.pixels[..4]);
    assert_eq!(&out.pixels[12..16], &img.pixels[4..8]);

    assert_eq!(resize_image(&img, 2, 1).unwrap(), img);
}

#[test]
fn convert_reencodes_in_target_kind() {
    let img = gradient(8, 4);
    let bytes = convert_format(&img, MediaKind::Jpeg, Some(4), None, Some(90)).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    let back = decode_raster(&bytes, MediaKind::Jpeg).unwrap();
    assert_eq!((back.width, back.height), (4, 2));

    let png = convert_format(&img, MediaKind::Png, None, None, None).unwrap();
    assert_eq!(decode_raster(&png, MediaKind::Png).unwrap(), img);
}

#[test]
fn convert_to_audio_is_kind_mismatch() {
    assert!(matches!(
        convert_format(&gradient(1, 1), MediaKind::Mp3, None, None, None),
        Err(ModkitError::KindMismatch(_))
    ));
}

#[test]
fn oversized_targets_are_rejected_before_allocating() {
    assert!(matches!(
        target_dimensions(10, 10, Some(u32::MAX), Some(u32::MAX)),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert!(matches!(
        target_dimensions(1, 1000, Some(60_000), None),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert!(matches!(
        resize_image(&gradient(2, 2), MAX_DIMENSION + 1, 1),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert!(matches!(
        convert_format(&gradient(2, 2), MediaKind::Png, Some(u32::MAX), Some(u32::MAX), None),
        Err(ModkitError::InvalidDimensions(_))
    ));
    assert_eq!(
        target_dimensions(100, 1, Some(MAX_DIMENSION), None).unwrap(),
        (MAX_DIMENSION, 655)
    );
}
