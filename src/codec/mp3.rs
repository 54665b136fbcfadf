//! MP3 encoding in fixed frame-sized blocks.
//!
//! [`encode_in_blocks`] owns the block/channel bookkeeping and is generic over
//! [`FrameBlockEncoder`]; [`LameEncoder`] is the production encoder backed by LAME.

use mp3lame_encoder::{Bitrate, Builder, DualPcm, Encoder, FlushNoGap, MonoPcm, Quality};
use tracing::debug;

use crate::{
    codec::audio::PcmBuffer,
    foundation::error::{ModkitError, ModkitResult},
};

/// Samples per channel handed to the encoder per call; one MPEG-1 Layer III frame.
pub const MP3_FRAME_SAMPLES: usize = 1152;

const SUPPORTED_BITRATES_KBPS: &[u32] = &[
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// MP3 encoder settings.
pub struct Mp3Settings {
    /// Constant bitrate in kbit/s. Must be one of the standard Layer III rates.
    pub bitrate_kbps: u32,
    /// LAME algorithm quality, 0 (best, slowest) ..= 9 (worst, fastest).
    pub quality: u8,
}

impl Default for Mp3Settings {
    fn default() -> Self {
        Self {
            bitrate_kbps: 128,
            quality: 5,
        }
    }
}

impl Mp3Settings {
    pub fn validate(&self) -> ModkitResult<()> {
        if !SUPPORTED_BITRATES_KBPS.contains(&self.bitrate_kbps) {
            return Err(ModkitError::config(format!(
                "unsupported mp3 bitrate {} kbps",
                self.bitrate_kbps
            )));
        }
        if self.quality > 9 {
            return Err(ModkitError::config(format!(
                "mp3 quality must be in 0..=9, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Sink for one block of at most [`MP3_FRAME_SAMPLES`] samples per channel.
///
/// Implementations append encoded bytes to `out`.
pub trait FrameBlockEncoder {
    /// Encode one mono block.
    fn encode_mono(&mut self, samples: &[i16], out: &mut Vec<u8>) -> ModkitResult<()>;
    /// Encode one stereo block; `left` and `right` have equal length.
    fn encode_stereo(&mut self, left: &[i16], right: &[i16], out: &mut Vec<u8>)
    -> ModkitResult<()>;
    /// Drain any buffered frames after the last block.
    fn flush(&mut self, out: &mut Vec<u8>) -> ModkitResult<()>;
}

/// Encode `pcm` as MP3 with the given settings.
pub fn encode_audio_to_target(pcm: &PcmBuffer, settings: &Mp3Settings) -> ModkitResult<Vec<u8>> {
    check_layout(pcm)?;
    let mut encoder = LameEncoder::new(pcm.sample_rate, pcm.channel_count(), settings)?;
    let bytes = encode_in_blocks(pcm, &mut encoder)?;
    debug!(
        frames = pcm.frames(),
        channels = pcm.channel_count(),
        bytes = bytes.len(),
        "encoded mp3"
    );
    Ok(bytes)
}

/// Feed `pcm` to `encoder` in blocks of [`MP3_FRAME_SAMPLES`], including a trailing partial
/// block, then flush.
pub fn encode_in_blocks<E: FrameBlockEncoder + ?Sized>(
    pcm: &PcmBuffer,
    encoder: &mut E,
) -> ModkitResult<Vec<u8>> {
    check_layout(pcm)?;
    let mut out = Vec::new();
    match pcm.channels.as_slice() {
        [mono] => {
            for block in mono.chunks(MP3_FRAME_SAMPLES) {
                let block = to_i16(block);
                encoder.encode_mono(&block, &mut out)?;
            }
        }
        [left, right] => {
            for (l, r) in left
                .chunks(MP3_FRAME_SAMPLES)
                .zip(right.chunks(MP3_FRAME_SAMPLES))
            {
                encoder.encode_stereo(&to_i16(l), &to_i16(r), &mut out)?;
            }
        }
        _ => return Err(ModkitError::UnsupportedChannelLayout(pcm.channel_count())),
    }
    encoder.flush(&mut out)?;
    Ok(out)
}

/// Convert a float sample in [-1, 1] to i16, scaling negatives by 32768 and positives by 32767.
pub fn sample_to_i16(s: f32) -> i16 {
    let s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

fn to_i16(block: &[f32]) -> Vec<i16> {
    block.iter().copied().map(sample_to_i16).collect()
}

fn check_layout(pcm: &PcmBuffer) -> ModkitResult<()> {
    match pcm.channel_count() {
        1 | 2 => Ok(()),
        n => Err(ModkitError::UnsupportedChannelLayout(n)),
    }
}

/// LAME-backed [`FrameBlockEncoder`] producing constant-bitrate MP3.
pub struct LameEncoder {
    inner: Encoder,
}

impl LameEncoder {
    pub fn new(sample_rate: u32, channels: usize, settings: &Mp3Settings) -> ModkitResult<Self> {
        settings.validate()?;
        let channels = match channels {
            1 => 1u8,
            2 => 2u8,
            n => return Err(ModkitError::UnsupportedChannelLayout(n)),
        };

        let mut builder =
            Builder::new().ok_or_else(|| ModkitError::encode("failed to create LAME builder"))?;
        builder
            .set_num_channels(channels)
            .map_err(|e| ModkitError::encode(format!("set channels: {e:?}")))?;
        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| ModkitError::encode(format!("set sample rate {sample_rate}: {e:?}")))?;
        builder
            .set_brate(bitrate(settings.bitrate_kbps)?)
            .map_err(|e| ModkitError::encode(format!("set bitrate: {e:?}")))?;
        builder
            .set_quality(quality(settings.quality))
            .map_err(|e| ModkitError::encode(format!("set quality: {e:?}")))?;
        let inner = builder
            .build()
            .map_err(|e| ModkitError::encode(format!("initialize LAME: {e:?}")))?;
        Ok(Self { inner })
    }
}

impl FrameBlockEncoder for LameEncoder {
    fn encode_mono(&mut self, samples: &[i16], out: &mut Vec<u8>) -> ModkitResult<()> {
        out.reserve(mp3lame_encoder::max_required_buffer_size(samples.len()));
        self.inner
            .encode_to_vec(MonoPcm(samples), out)
            .map_err(|e| ModkitError::encode(format!("encode mono block: {e:?}")))?;
        Ok(())
    }

    fn encode_stereo(
        &mut self,
        left: &[i16],
        right: &[i16],
        out: &mut Vec<u8>,
    ) -> ModkitResult<()> {
        out.reserve(mp3lame_encoder::max_required_buffer_size(left.len()));
        self.inner
            .encode_to_vec(DualPcm { left, right }, out)
            .map_err(|e| ModkitError::encode(format!("encode stereo block: {e:?}")))?;
        Ok(())
    }

    fn flush(&mut self, out: &mut Vec<u8>) -> ModkitResult<()> {
        out.reserve(7200);
        self.inner
            .flush_to_vec::<FlushNoGap>(out)
            .map_err(|e| ModkitError::encode(format!("flush encoder: {e:?}")))?;
        Ok(())
    }
}

fn bitrate(kbps: u32) -> ModkitResult<Bitrate> {
    Ok(match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(ModkitError::config(format!(
                "unsupported mp3 bitrate {other} kbps"
            )));
        }
    })
}

fn quality(q: u8) -> Quality {
    match q {
        0 => Quality::Best,
        1 => Quality::SecondBest,
        2 => Quality::NearBest,
        3 => Quality::VeryNice,
        4 => Quality::Nice,
        5 => Quality::Good,
        6 => Quality::Decent,
        7 => Quality::Ok,
        8 => Quality::SecondWorst,
        _ => Quality::Worst,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/mp3.rs"]
mod tests;
