//! Linear fade envelopes
//!
//! Fades are applied per frame, so every channel of a frame gets the same
//! gain. A ramp longer than the buffer is shortened to the buffer length.

use crate::audio::AudioBuffer;
use tracing::debug;

/// Length of the music fade-in and fade-out ramps
pub const FADE_DURATION_MS: u64 = 3000;

/// Number of frames a ramp of `duration_ms` covers in `buffer`
fn ramp_frames(buffer: &AudioBuffer, duration_ms: u64) -> usize {
    buffer.frames_for_ms(duration_ms).min(buffer.frame_count())
}

/// Ramp amplitude linearly from 0.0 up to 1.0 over the first `duration_ms`.
///
/// Frame k of an N-frame ramp is scaled by k/N.
pub fn fade_in(buffer: &AudioBuffer, duration_ms: u64) -> AudioBuffer {
    let ramp = ramp_frames(buffer, duration_ms);
    debug!("Fade-in over {} frames", ramp);

    apply_envelope(buffer, |frame| {
        if frame < ramp {
            frame as f32 / ramp as f32
        } else {
            1.0
        }
    })
}

/// Ramp amplitude linearly from 1.0 down to 0.0 over the last `duration_ms`.
///
/// Frame k of the final N-frame ramp is scaled by 1 - (k+1)/N; the last frame
/// is silent.
pub fn fade_out(buffer: &AudioBuffer, duration_ms: u64) -> AudioBuffer {
    let ramp = ramp_frames(buffer, duration_ms);
    let start = buffer.frame_count() - ramp;
    debug!("Fade-out over {} frames starting at frame {}", ramp, start);

    apply_envelope(buffer, |frame| {
        if frame < start {
            1.0
        } else {
            1.0 - (frame - start + 1) as f32 / ramp as f32
        }
    })
}

fn apply_envelope(buffer: &AudioBuffer, gain_at: impl Fn(usize) -> f32) -> AudioBuffer {
    let channels = buffer.channel_count() as usize;
    let samples = buffer
        .samples()
        .chunks_exact(channels)
        .enumerate()
        .flat_map(|(frame, samples)| {
            let gain = gain_at(frame);
            samples.iter().map(move |s| s * gain)
        })
        .collect();

    buffer.with_samples(samples)
}
