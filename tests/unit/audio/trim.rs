use super::*;

fn ramp(frames: usize, rate: u32, channels: usize) -> PcmBuffer {
    let ch: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
    PcmBuffer::new(rate, vec![ch; channels]).unwrap()
}

#[test]
fn seconds_map_to_floored_sample_indices() {
    assert_eq!(sec_to_sample(0.0, 44_100), 0);
    assert_eq!(sec_to_sample(-3.0, 44_100), 0);
    assert_eq!(sec_to_sample(f64::NAN, 44_100), 0);
    assert_eq!(sec_to_sample(1.0, 44_100), 44_100);
    assert_eq!(sec_to_sample(0.5, 44_100), 22_050);
    assert_eq!(sec_to_sample(0.00001, 44_100), 0);
    assert_eq!(sec_to_sample(0.1, 44_100), 4_410);
}

#[test]
fn full_duration_keeps_every_sample() {
    let pcm = ramp(44_100 + 17, 44_100, 2);
    let out = trim(&pcm, 0.0, pcm.duration_secs()).unwrap();
    assert_eq!(out, pcm);
}

#[test]
fn trims_every_channel_to_the_same_window() {
    let pcm = ramp(1000, 1000, 2);
    let out = trim(&pcm, 0.25, 0.5).unwrap();
    assert_eq!(out.frames(), 250);
    assert_eq!(out.channel_count(), 2);
    assert_eq!(out.channels[0][0], pcm.channels[0][250]);
    assert_eq!(out.channels[1][249], pcm.channels[1][499]);
}

#[test]
fn end_is_clamped_and_negative_start_is_zero() {
    let pcm = ramp(100, 100, 1);
    let out = trim(&pcm, -1.0, 10.0).unwrap();
    assert_eq!(out.frames(), 100);
}

#[test]
fn empty_ranges_are_rejected() {
    let pcm = ramp(100, 100, 1);
    for (start, end) in [(0.5, 0.5), (0.6, 0.2), (2.0, 3.0), (f64::NAN, 1.0)] {
        assert!(
            matches!(trim(&pcm, start, end), Err(ModkitError::InvalidRange(_))),
            "{start}..{end}"
        );
    }
}

#[test]
fn infinite_end_runs_to_the_last_sample() {
    assert_eq!(sec_to_sample(f64::INFINITY, 100), usize::MAX);
    let pcm = ramp(100, 100, 2);
    assert_eq!(trim(&pcm, 0.0, f64::INFINITY).unwrap(), pcm);
    assert_eq!(trim(&pcm, 0.5, f64::INFINITY).unwrap().frames(), 50);
}
