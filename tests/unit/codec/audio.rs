use std::io::Cursor;

use super::*;

fn wav_bytes(sample_rate: u32, channels: u16, frames: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Vec::new();
    {
        let mut w = hound::WavWriter::new(Cursor::new(&mut buf), spec).unwrap();
        for i in 0..frames {
            for ch in 0..channels {
                let v = if ch == 0 { 8000 } else { -8000 };
                w.write_sample(if i % 2 == 0 { v } else { v / 2 } as i16).unwrap();
            }
        }
        w.finalize().unwrap();
    }
    buf
}

#[test]
fn decodes_stereo_wav_into_planar_channels() {
    let pcm = decode_audio(&wav_bytes(22_050, 2, 1000)).unwrap();
    assert_eq!(pcm.sample_rate, 22_050);
    assert_eq!(pcm.channel_count(), 2);
    assert_eq!(pcm.frames(), 1000);
    assert!(pcm.channels[0][0] > 0.2);
    assert!(pcm.channels[1][0] < -0.2);
}

#[test]
fn decodes_mono_wav() {
    let pcm = decode_audio(&wav_bytes(8_000, 1, 400)).unwrap();
    assert_eq!(pcm.channel_count(), 1);
    assert_eq!(pcm.frames(), 400);
    assert!((pcm.duration_secs() - 0.05).abs() < 1e-9);
}

#[test]
fn rejects_more_than_two_channels() {
    assert!(matches!(
        decode_audio(&wav_bytes(8_000, 3, 100)),
        Err(ModkitError::Decode(_))
    ));
}

#[test]
fn rejects_unrecognized_container() {
    assert!(matches!(
        decode_audio(b"this is not audio at all, just some text bytes"),
        Err(ModkitError::Decode(_))
    ));
}

#[test]
fn pcm_buffer_checks_channel_lengths() {
    assert!(PcmBuffer::new(44_100, vec![vec![0.0; 3], vec![0.0; 2]]).is_err());
    assert!(PcmBuffer::new(0, vec![vec![0.0; 3]]).is_err());
    let pcm = PcmBuffer::new(10, vec![vec![0.0; 25]]).unwrap();
    assert_eq!(pcm.frames(), 25);
    assert!((pcm.duration_secs() - 2.5).abs() < 1e-12);
}
