//! Audio decoding via Symphonia into planar `f32` PCM.

use std::io::Cursor;

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, warn};

use crate::foundation::error::{ModkitError, ModkitResult};

#[derive(Clone, Debug, PartialEq)]
/// Decoded planar PCM.
pub struct PcmBuffer {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// One sample vector per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    /// Build a buffer, checking that every channel has the same length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> ModkitResult<Self> {
        if sample_rate == 0 {
            return Err(ModkitError::decode("sample rate must be > 0"));
        }
        if let Some(first) = channels.first()
            && channels.iter().any(|c| c.len() != first.len())
        {
            return Err(ModkitError::decode("channels have differing sample counts"));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode an audio container (MP3, WAV, FLAC, OGG) into planar PCM.
///
/// Fails with [`ModkitError::Decode`] when the container is not recognized, nothing decodes, or
/// the stream is neither mono nor stereo.
pub fn decode_audio(bytes: &[u8]) -> ModkitResult<PcmBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ModkitError::decode(format!("unrecognized audio container: {e}")))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ModkitError::decode("no audio track"))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| ModkitError::decode(format!("unsupported audio codec: {e}")))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(ModkitError::decode(format!("read audio packet: {e}"))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(error = %msg, "skipping corrupted audio packet");
                continue;
            }
            Err(e) => return Err(ModkitError::decode(format!("decode audio packet: {e}"))),
        };

        let spec = *decoded.spec();
        let n_channels = spec.channels.count();
        if !(1..=2).contains(&n_channels) {
            return Err(ModkitError::decode(format!(
                "audio must be mono or stereo, got {n_channels} channels"
            )));
        }
        if channels.is_empty() {
            channels = vec![Vec::new(); n_channels];
            sample_rate = spec.rate;
        } else if channels.len() != n_channels {
            return Err(ModkitError::decode("channel count changed mid-stream"));
        }
        if decoded.frames() == 0 {
            continue;
        }

        let needs_alloc = sample_buf
            .as_ref()
            .is_none_or(|b| b.capacity() < decoded.capacity() * n_channels);
        if needs_alloc {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        for frame in buf.samples().chunks_exact(n_channels) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
    }

    if channels.is_empty() || channels[0].is_empty() {
        return Err(ModkitError::decode("audio stream contains no samples"));
    }
    debug!(
        sample_rate,
        channels = channels.len(),
        frames = channels[0].len(),
        "decoded audio"
    );
    PcmBuffer::new(sample_rate, channels)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/audio.rs"]
mod tests;
