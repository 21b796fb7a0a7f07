//! Audio Test File Generation Utilities
//!
//! Generates deterministic WAV files and buffers with known characteristics
//! (sample rate, channel count, duration, frequency) for loader and mixer tests.

use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;
use voxmix_engine::AudioBuffer;

/// Shape of a generated sine-wave fixture
#[derive(Debug, Clone, Copy)]
pub struct WavFixture {
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frequency_hz: f32,

    /// Amplitude 0.0-1.0 (0.5 recommended to avoid clipping)
    pub amplitude: f32,
}

impl WavFixture {
    pub fn new(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        Self {
            duration_ms,
            sample_rate,
            channels,
            frequency_hz: 440.0,
            amplitude: 0.5,
        }
    }

    pub fn frames(&self) -> usize {
        (self.sample_rate as u64 * self.duration_ms / 1000) as usize
    }
}

/// Generate a 16-bit sine wave WAV file
///
/// # Example
/// ```no_run
/// # use std::path::Path;
/// // 1 second of 440 Hz stereo at 44.1 kHz
/// generate_sine_wav(Path::new("/tmp/sine_440hz_1s.wav"), WavFixture::new(1000, 44100, 2))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate_sine_wav<P: AsRef<Path>>(path: P, fixture: WavFixture) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: fixture.channels,
        sample_rate: fixture.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let amplitude_i16 = fixture.amplitude * i16::MAX as f32;

    for frame_idx in 0..fixture.frames() {
        let t = frame_idx as f32 / fixture.sample_rate as f32;
        let sample = ((2.0 * PI * fixture.frequency_hz * t).sin() * amplitude_i16) as i16;

        // Same value on every channel
        for _ in 0..fixture.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// In-memory sine buffer with the given shape
pub fn sine_buffer(fixture: WavFixture) -> AudioBuffer {
    let channels = fixture.channels as usize;
    let mut samples = Vec::with_capacity(fixture.frames() * channels);
    for frame_idx in 0..fixture.frames() {
        let t = frame_idx as f32 / fixture.sample_rate as f32;
        let sample = (2.0 * PI * fixture.frequency_hz * t).sin() * fixture.amplitude;
        samples.extend(std::iter::repeat(sample).take(channels));
    }
    AudioBuffer::new(samples, fixture.sample_rate, fixture.channels).unwrap()
}

/// In-memory buffer holding one value everywhere
pub fn constant_buffer(value: f32, duration_ms: u64, sample_rate: u32, channels: u16) -> AudioBuffer {
    let frames = (sample_rate as u64 * duration_ms / 1000) as usize;
    AudioBuffer::new(vec![value; frames * channels as usize], sample_rate, channels).unwrap()
}
