use super::*;

fn image_of(pixels: &[[u8; 4]]) -> RasterImage {
    RasterImage::from_rgba8(pixels.len() as u32, 1, pixels.concat()).unwrap()
}

#[test]
fn identity_leaves_pixels_unchanged() {
    let img = image_of(&[[0, 0, 0, 255], [12, 200, 99, 10], [255, 255, 255, 0]]);
    let out = apply_color_adjust(&img, &ColorAdjust::IDENTITY).unwrap();
    for (a, b) in img.pixels.iter().zip(&out.pixels) {
        assert!(a.abs_diff(*b) <= 1, "{a} vs {b}");
    }
}

#[test]
fn zero_saturation_collapses_to_luminance() {
    let adjust = ColorAdjust {
        saturation: 0.0,
        ..ColorAdjust::IDENTITY
    };
    for rgb in [[200u8, 40, 10], [0, 255, 0], [17, 17, 200]] {
        let expected = luminance(rgb).round().clamp(0.0, 255.0) as u8;
        assert_eq!(adjust.apply_rgb(rgb), [expected; 3]);
    }
}

#[test]
fn brightness_scales_and_clamps() {
    let adjust = ColorAdjust {
        brightness: 2.0,
        ..ColorAdjust::IDENTITY
    };
    assert_eq!(adjust.apply_rgb([10, 100, 200]), [20, 200, 255]);
    let dark = ColorAdjust {
        brightness: 0.0,
        ..ColorAdjust::IDENTITY
    };
    assert_eq!(dark.apply_rgb([10, 100, 200]), [0, 0, 0]);
}

#[test]
fn zero_contrast_flattens_to_mid_grey() {
    let adjust = ColorAdjust {
        contrast: 0.0,
        ..ColorAdjust::IDENTITY
    };
    let [r, g, b] = adjust.apply_rgb([0, 128, 255]);
    for c in [r, g, b] {
        assert!(c.abs_diff(128) <= 2, "{c}");
    }
}

#[test]
fn alpha_is_preserved() {
    let img = image_of(&[[90, 60, 30, 7]]);
    let out = apply_color_adjust(&img, &ColorAdjust::from_percent(150.0, 80.0, 120.0)).unwrap();
    assert_eq!(out.pixels[3], 7);
    assert_eq!((out.width, out.height), (1, 1));
}

#[test]
fn percent_constructor_and_validation() {
    assert_eq!(
        ColorAdjust::from_percent(100.0, 100.0, 100.0),
        ColorAdjust::IDENTITY
    );
    let negative = ColorAdjust::from_percent(-10.0, 100.0, 100.0);
    assert!(matches!(negative.validate(), Err(ModkitError::InvalidRange(_))));
    let nan = ColorAdjust {
        brightness: f32::NAN,
        ..ColorAdjust::IDENTITY
    };
    assert!(nan.validate().is_err());
    let steep = ColorAdjust {
        contrast: 3.0,
        ..ColorAdjust::IDENTITY
    };
    assert!(steep.validate().is_err());
    assert!(ColorAdjust::from_percent(200.0, 200.0, 200.0).validate().is_ok());
}
