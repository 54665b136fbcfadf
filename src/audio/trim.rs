use crate::{
    codec::{
        audio::PcmBuffer,
        mp3::{Mp3Settings, encode_audio_to_target},
    },
    foundation::error::{ModkitError, ModkitResult},
};

// Seconds * rate values within this distance below an integer land on that integer, so
// `trim(pcm, 0, pcm.duration_secs())` keeps every sample.
const SAMPLE_EPSILON: f64 = 1e-6;

/// Convert a time in seconds to a sample index, flooring and clamping negatives to zero.
///
/// NaN maps to zero and `+inf` to `usize::MAX`, so an unbounded end clamps to the buffer length.
pub fn sec_to_sample(sec: f64, sample_rate: u32) -> usize {
    if sec.is_nan() || sec <= 0.0 {
        return 0;
    }
    if sec == f64::INFINITY {
        return usize::MAX;
    }
    (sec * f64::from(sample_rate) + SAMPLE_EPSILON).floor() as usize
}

/// Keep the samples in `[start_secs, end_secs)` of every channel.
///
/// The end is clamped to the buffer length; an empty result is [`ModkitError::InvalidRange`].
pub fn trim(pcm: &PcmBuffer, start_secs: f64, end_secs: f64) -> ModkitResult<PcmBuffer> {
    if start_secs.is_nan() || end_secs.is_nan() {
        return Err(ModkitError::invalid_range("trim bounds must not be NaN"));
    }
    let total = pcm.frames();
    let start = sec_to_sample(start_secs, pcm.sample_rate);
    let end = sec_to_sample(end_secs, pcm.sample_rate).min(total);
    if end <= start {
        return Err(ModkitError::invalid_range(format!(
            "trim {start_secs:.3}s..{end_secs:.3}s selects samples {start}..{end} of {total}"
        )));
    }
    Ok(PcmBuffer {
        sample_rate: pcm.sample_rate,
        channels: pcm
            .channels
            .iter()
            .map(|ch| ch[start..end].to_vec())
            .collect(),
    })
}

/// Encode PCM to the target MP3 format.
pub fn encode(pcm: &PcmBuffer, settings: &Mp3Settings) -> ModkitResult<Vec<u8>> {
    encode_audio_to_target(pcm, settings)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/trim.rs"]
mod tests;
