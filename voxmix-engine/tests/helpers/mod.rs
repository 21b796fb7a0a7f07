//! Test helper modules for voxmix engine integration tests
//!
//! Provides reusable test infrastructure components:
//! - audio_generator: deterministic WAV fixtures and in-memory buffers
//! - FakeSynthesizer: a speech synthesizer that writes a generated WAV

#![allow(dead_code, unused_imports)]

pub mod audio_generator;

use std::path::Path;
use voxmix_engine::synth::{SpeechSynthesizer, SynthesisRequest};
use voxmix_engine::{Error, Result};

pub use audio_generator::{constant_buffer, generate_sine_wav, sine_buffer, WavFixture};

/// Synthesizer stand-in: writes a sine-wave WAV of a fixed duration
pub struct FakeSynthesizer {
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<()> {
        request.validate()?;
        generate_sine_wav(
            output,
            WavFixture {
                duration_ms: self.duration_ms,
                sample_rate: self.sample_rate,
                channels: self.channels,
                frequency_hz: 220.0,
                amplitude: 0.3,
            },
        )
        .map_err(|e| Error::Synthesis(e.to_string()))
    }

    fn output_extension(&self) -> &'static str {
        "wav"
    }
}
