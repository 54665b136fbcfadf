use std::{fmt, sync::Arc};

use crate::{
    audio::trim::trim,
    codec::{
        audio::decode_audio,
        mp3::{Mp3Settings, encode_audio_to_target},
        raster::{MAX_DIMENSION, RasterImage, checked_buffer_len, decode_raster, encode_raster},
    },
    foundation::{
        config::{DEFAULT_JPEG_QUALITY, EditorConfig},
        core::{AssetKey, MediaFamily, MediaKind, Rgba8},
        error::{ModkitError, ModkitResult},
    },
    imaging::{
        adjust::{ColorAdjust, apply_color_adjust},
        convert::{convert_format, resize_image},
        fill::{blend_color, generate_solid_fill},
    },
    selection::tracker::SelectionMode,
};

#[derive(Clone)]
/// A transform applied to every selected asset in one batch.
pub enum BulkOperation {
    /// Brightness/contrast/saturation filter.
    ColorAdjust(ColorAdjust),
    /// Blend every pixel towards `color`.
    Recolor {
        color: Rgba8,
        /// 0 keeps the image, 1 paints it solid.
        strength: f32,
    },
    /// Replace each image with a solid fill. Missing dimensions come from the asset's current
    /// image.
    Generate {
        color: Rgba8,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Replace each image with the supplied one, stretched to the asset's current size and
    /// encoded in its current kind.
    ReplaceImage { bytes: Arc<Vec<u8>> },
    /// Re-encode as `kind`, optionally resizing.
    ConvertFormat {
        kind: MediaKind,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Replace each clip with the supplied audio, optionally trimmed, encoded as MP3 once per
    /// batch.
    ReplaceAudio {
        bytes: Arc<Vec<u8>>,
        start_secs: Option<f64>,
        end_secs: Option<f64>,
    },
    /// Trim each clip to `[start_secs, end_secs)` and re-encode.
    TrimAudio { start_secs: f64, end_secs: f64 },
    /// Flip each asset's excluded flag.
    ToggleExclusion,
}

impl fmt::Debug for BulkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColorAdjust(a) => f.debug_tuple("ColorAdjust").field(a).finish(),
            Self::Recolor { color, strength } => f
                .debug_struct("Recolor")
                .field("color", color)
                .field("strength", strength)
                .finish(),
            Self::Generate {
                color,
                width,
                height,
            } => f
                .debug_struct("Generate")
                .field("color", color)
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::ReplaceImage { bytes } => f
                .debug_struct("ReplaceImage")
                .field("bytes_len", &bytes.len())
                .finish(),
            Self::ConvertFormat {
                kind,
                width,
                height,
            } => f
                .debug_struct("ConvertFormat")
                .field("kind", kind)
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::ReplaceAudio {
                bytes,
                start_secs,
                end_secs,
            } => f
                .debug_struct("ReplaceAudio")
                .field("bytes_len", &bytes.len())
                .field("start_secs", start_secs)
                .field("end_secs", end_secs)
                .finish(),
            Self::TrimAudio {
                start_secs,
                end_secs,
            } => f
                .debug_struct("TrimAudio")
                .field("start_secs", start_secs)
                .field("end_secs", end_secs)
                .finish(),
            Self::ToggleExclusion => f.write_str("ToggleExclusion"),
        }
    }
}

impl BulkOperation {
    /// Short name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorAdjust(_) => "color_adjust",
            Self::Recolor { .. } => "recolor",
            Self::Generate { .. } => "generate",
            Self::ReplaceImage { .. } => "replace_image",
            Self::ConvertFormat { .. } => "convert_format",
            Self::ReplaceAudio { .. } => "replace_audio",
            Self::TrimAudio { .. } => "trim_audio",
            Self::ToggleExclusion => "toggle_exclusion",
        }
    }

    /// Family this operation applies to; `None` applies to every asset.
    pub fn family(&self) -> Option<MediaFamily> {
        match self {
            Self::ColorAdjust(_)
            | Self::Recolor { .. }
            | Self::Generate { .. }
            | Self::ReplaceImage { .. }
            | Self::ConvertFormat { .. } => Some(MediaFamily::Raster),
            Self::ReplaceAudio { .. } | Self::TrimAudio { .. } => Some(MediaFamily::Audio),
            Self::ToggleExclusion => None,
        }
    }

    /// Selection mode the tracker must be in for this operation.
    pub fn required_mode(&self) -> SelectionMode {
        match self {
            Self::ToggleExclusion => SelectionMode::Exclude,
            _ => SelectionMode::Edit,
        }
    }

    /// Validate parameters and do the batch-wide work once (decoding replacement images,
    /// encoding replacement audio).
    pub(crate) fn prepare(&self, settings: &TransformSettings) -> ModkitResult<PreparedOp> {
        Ok(match self {
            Self::ColorAdjust(a) => {
                a.validate()?;
                PreparedOp::ColorAdjust(*a)
            }
            Self::Recolor { color, strength } => PreparedOp::Recolor {
                color: *color,
                strength: *strength,
            },
            Self::Generate {
                color,
                width,
                height,
            } => {
                check_requested_dimensions(*width, *height)?;
                PreparedOp::Generate {
                    color: *color,
                    width: *width,
                    height: *height,
                }
            }
            // The container is sniffed, the kind is only a fallback.
            Self::ReplaceImage { bytes } => {
                PreparedOp::ReplaceImage(decode_raster(bytes, MediaKind::Png)?)
            }
            Self::ConvertFormat {
                kind,
                width,
                height,
            } => {
                if !kind.is_raster() {
                    return Err(ModkitError::kind_mismatch(format!(
                        "cannot convert images to {kind}"
                    )));
                }
                check_requested_dimensions(*width, *height)?;
                PreparedOp::ConvertFormat {
                    kind: *kind,
                    width: *width,
                    height: *height,
                }
            }
            Self::ReplaceAudio {
                bytes,
                start_secs,
                end_secs,
            } => {
                let pcm = decode_audio(bytes)?;
                let pcm = match (start_secs, end_secs) {
                    (None, None) => pcm,
                    (start, end) => trim(
                        &pcm,
                        start.unwrap_or(0.0),
                        end.unwrap_or_else(|| pcm.duration_secs()),
                    )?,
                };
                PreparedOp::ReplaceAudio(Arc::new(encode_audio_to_target(&pcm, &settings.mp3)?))
            }
            Self::TrimAudio {
                start_secs,
                end_secs,
            } => {
                if start_secs.is_nan() || end_secs.is_nan() || end_secs <= start_secs {
                    return Err(ModkitError::invalid_range(format!(
                        "trim range {start_secs}..{end_secs} is empty"
                    )));
                }
                PreparedOp::TrimAudio {
                    start_secs: *start_secs,
                    end_secs: *end_secs,
                }
            }
            Self::ToggleExclusion => PreparedOp::ToggleExclusion,
        })
    }
}

/// Reject sizes no asset could satisfy before the batch starts. Sizes that depend on each asset
/// are checked again per asset.
fn check_requested_dimensions(width: Option<u32>, height: Option<u32>) -> ModkitResult<()> {
    match (width, height) {
        (Some(w), Some(h)) => checked_buffer_len(w, h).map(|_| ()),
        (Some(v), None) | (None, Some(v)) if v == 0 || v > MAX_DIMENSION => {
            Err(ModkitError::invalid_dimensions(format!(
                "requested side {v} is outside 1..={MAX_DIMENSION}"
            )))
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Encoder parameters used by transforms.
pub struct TransformSettings {
    pub jpeg_quality: u8,
    pub mp3: Mp3Settings,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            mp3: Mp3Settings::default(),
        }
    }
}

impl From<&EditorConfig> for TransformSettings {
    fn from(cfg: &EditorConfig) -> Self {
        Self {
            jpeg_quality: cfg.jpeg_quality,
            mp3: cfg.mp3,
        }
    }
}

/// [`BulkOperation`] with batch-wide inputs already decoded.
pub(crate) enum PreparedOp {
    ColorAdjust(ColorAdjust),
    Recolor {
        color: Rgba8,
        strength: f32,
    },
    Generate {
        color: Rgba8,
        width: Option<u32>,
        height: Option<u32>,
    },
    ReplaceImage(RasterImage),
    ConvertFormat {
        kind: MediaKind,
        width: Option<u32>,
        height: Option<u32>,
    },
    ReplaceAudio(Arc<Vec<u8>>),
    TrimAudio {
        start_secs: f64,
        end_secs: f64,
    },
    ToggleExclusion,
}

#[derive(Clone, Debug)]
/// Snapshot of one record handed to a transform.
pub(crate) struct AssetInput {
    pub(crate) key: AssetKey,
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) kind: MediaKind,
    pub(crate) excluded: bool,
}

#[derive(Clone, Debug)]
/// What a transform wants written back to the registry.
pub(crate) struct AssetOutput {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) kind: MediaKind,
    pub(crate) excluded: Option<bool>,
}

/// Run one prepared operation on one asset. Pure: reads `input`, returns new content.
pub(crate) fn transform_asset(
    op: &PreparedOp,
    input: &AssetInput,
    settings: &TransformSettings,
) -> ModkitResult<AssetOutput> {
    let quality = Some(settings.jpeg_quality);
    let encoded = |img: &RasterImage, kind: MediaKind| -> ModkitResult<AssetOutput> {
        Ok(AssetOutput {
            bytes: Arc::new(encode_raster(img, kind, quality)?),
            kind,
            excluded: None,
        })
    };

    match op {
        PreparedOp::ColorAdjust(adjust) => {
            let src = decode_raster(&input.bytes, input.kind)?;
            encoded(&apply_color_adjust(&src, adjust)?, input.kind)
        }
        PreparedOp::Recolor { color, strength } => {
            let src = decode_raster(&input.bytes, input.kind)?;
            encoded(&blend_color(&src, *color, *strength), input.kind)
        }
        PreparedOp::Generate {
            color,
            width,
            height,
        } => {
            let (w, h) = match (width, height) {
                (Some(w), Some(h)) => (*w, *h),
                _ => {
                    let src = decode_raster(&input.bytes, input.kind)?;
                    (width.unwrap_or(src.width), height.unwrap_or(src.height))
                }
            };
            encoded(&generate_solid_fill(*color, w, h)?, input.kind)
        }
        PreparedOp::ReplaceImage(replacement) => {
            let (w, h) = match decode_raster(&input.bytes, input.kind) {
                Ok(src) => (src.width, src.height),
                Err(e) => {
                    tracing::debug!(
                        asset = %input.key,
                        error = %e,
                        "current image unreadable, keeping replacement size"
                    );
                    (replacement.width, replacement.height)
                }
            };
            encoded(&resize_image(replacement, w, h)?, input.kind)
        }
        PreparedOp::ConvertFormat {
            kind,
            width,
            height,
        } => {
            let src = decode_raster(&input.bytes, input.kind)?;
            Ok(AssetOutput {
                bytes: Arc::new(convert_format(&src, *kind, *width, *height, quality)?),
                kind: *kind,
                excluded: None,
            })
        }
        PreparedOp::ReplaceAudio(bytes) => Ok(AssetOutput {
            bytes: Arc::clone(bytes),
            kind: MediaKind::Mp3,
            excluded: None,
        }),
        PreparedOp::TrimAudio {
            start_secs,
            end_secs,
        } => {
            let pcm = decode_audio(&input.bytes)?;
            let trimmed = trim(&pcm, *start_secs, *end_secs)?;
            Ok(AssetOutput {
                bytes: Arc::new(encode_audio_to_target(&trimmed, &settings.mp3)?),
                kind: MediaKind::Mp3,
                excluded: None,
            })
        }
        PreparedOp::ToggleExclusion => Ok(AssetOutput {
            bytes: Arc::clone(&input.bytes),
            kind: input.kind,
            excluded: Some(!input.excluded),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bulk/ops.rs"]
mod tests;
