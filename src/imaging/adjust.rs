use crate::{
    codec::raster::RasterImage,
    foundation::error::{ModkitError, ModkitResult},
};

const LUMA_R: f32 = 0.3086;
const LUMA_G: f32 = 0.6094;
const LUMA_B: f32 = 0.0820;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Brightness/contrast/saturation multipliers. `1.0` leaves a channel unchanged.
pub struct ColorAdjust {
    /// `0.0` collapses every pixel to its luminance; `2.0` doubles the distance from it.
    pub saturation: f32,
    /// Plain channel multiplier.
    pub brightness: f32,
    /// `0.0` flattens to mid grey, `2.0` is the steepest remap.
    pub contrast: f32,
}

impl Default for ColorAdjust {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorAdjust {
    pub const IDENTITY: Self = Self {
        saturation: 1.0,
        brightness: 1.0,
        contrast: 1.0,
    };

    /// Convenience constructor from 0..=200 percentage sliders.
    pub fn from_percent(saturation: f32, brightness: f32, contrast: f32) -> Self {
        Self {
            saturation: saturation / 100.0,
            brightness: brightness / 100.0,
            contrast: contrast / 100.0,
        }
    }

    pub fn validate(&self) -> ModkitResult<()> {
        for (name, v) in [
            ("saturation", self.saturation),
            ("brightness", self.brightness),
            ("contrast", self.contrast),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ModkitError::invalid_range(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        // c*255 == 259 would divide by zero.
        if self.contrast - 1.0 >= 259.0 / 255.0 {
            return Err(ModkitError::invalid_range(format!(
                "contrast {} is outside the supported range",
                self.contrast
            )));
        }
        Ok(())
    }

    fn contrast_factor(&self) -> f32 {
        let c = (self.contrast - 1.0) * 255.0;
        (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
    }

    /// Apply to one RGB triple. Stages run brightness, contrast, saturation; the clamp happens
    /// once at the end.
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let f = self.contrast_factor();
        let mut v = rgb.map(|c| {
            let b = f32::from(c) * self.brightness;
            f * (b - 128.0) + 128.0
        });
        let l = LUMA_R * v[0] + LUMA_G * v[1] + LUMA_B * v[2];
        for c in &mut v {
            *c = l + self.saturation * (*c - l);
        }
        v.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

/// Apply brightness, contrast and saturation to every pixel. Alpha is untouched.
pub fn apply_color_adjust(image: &RasterImage, adjust: &ColorAdjust) -> ModkitResult<RasterImage> {
    adjust.validate()?;
    let mut out = Vec::with_capacity(image.pixels.len());
    for px in image.pixels.chunks_exact(4) {
        let [r, g, b] = adjust.apply_rgb([px[0], px[1], px[2]]);
        out.extend_from_slice(&[r, g, b, px[3]]);
    }
    Ok(RasterImage {
        width: image.width,
        height: image.height,
        pixels: out,
    })
}

/// Luminance used by the saturation stage.
pub fn luminance(rgb: [u8; 3]) -> f32 {
    LUMA_R * f32::from(rgb[0]) + LUMA_G * f32::from(rgb[1]) + LUMA_B * f32::from(rgb[2])
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/adjust.rs"]
mod tests;
