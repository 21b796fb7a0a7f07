//! Audio resampling using rubato
//!
//! Converts a buffer to another sample rate while preserving its wall-clock
//! duration to within one frame.

use crate::audio::types::AudioBuffer;
use crate::error::{Error, MixStage, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Flush passes allowed when draining the resampler's output delay
const MAX_FLUSH_PASSES: usize = 8;

/// Audio resampler using rubato for sample rate conversion.
pub struct Resampler;

impl Resampler {
    /// Resample `buffer` to `target_rate`.
    ///
    /// # Returns
    /// A new buffer at `target_rate` with the same channel layout and
    /// `round(frames * target_rate / source_rate)` frames.
    ///
    /// # Notes
    /// If the buffer is already at `target_rate`, returns a copy without resampling
    pub fn resample(buffer: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer> {
        let input_rate = buffer.sample_rate();
        let channels = buffer.channel_count();

        if target_rate == 0 {
            return Err(Error::mix(MixStage::Resample, "target sample rate must be positive"));
        }

        if input_rate == target_rate {
            debug!("Sample rate already at {}Hz, skipping resample", target_rate);
            return Ok(buffer.clone());
        }

        let input_frames = buffer.frame_count();
        if input_frames == 0 {
            return Err(Error::mix(MixStage::Resample, "cannot resample an empty buffer"));
        }

        let expected_frames = Self::expected_frames(input_frames, input_rate, target_rate);

        debug!(
            "Resampling from {}Hz to {}Hz ({} channels, {} -> {} frames)",
            input_rate, target_rate, channels, input_frames, expected_frames
        );

        // De-interleave samples for rubato (which expects planar format)
        let planar_input = Self::deinterleave(buffer.samples(), channels);

        let mut resampler = Self::create_resampler(input_rate, target_rate, channels, input_frames)?;
        let delay = resampler.output_delay();

        let mut planar_output = resampler
            .process(&planar_input, None)
            .map_err(|e| Error::mix(MixStage::Resample, format!("Resampling failed: {}", e)))?;

        // Drain the filter delay so the tail of the track is not lost
        let mut passes = 0;
        while planar_output[0].len() < delay + expected_frames && passes < MAX_FLUSH_PASSES {
            let tail = resampler
                .process_partial::<Vec<f32>>(None, None)
                .map_err(|e| Error::mix(MixStage::Resample, format!("Flush failed: {}", e)))?;
            for (channel, rest) in planar_output.iter_mut().zip(tail) {
                channel.extend(rest);
            }
            passes += 1;
        }

        for channel in planar_output.iter_mut() {
            let end = (delay + expected_frames).min(channel.len());
            let mut aligned = channel[delay.min(end)..end].to_vec();
            aligned.resize(expected_frames, 0.0);
            *channel = aligned;
        }

        let interleaved = Self::interleave(planar_output);

        AudioBuffer::new(interleaved, target_rate, channels)
            .map_err(|e| Error::mix(MixStage::Resample, e.to_string()))
    }

    /// Output frame count that keeps the duration unchanged (rounded).
    ///
    /// Never 0 for a non-empty input, however strong the downsampling.
    pub fn expected_frames(input_frames: usize, input_rate: u32, output_rate: u32) -> usize {
        if input_frames == 0 {
            return 0;
        }
        let numerator = input_frames as u64 * output_rate as u64 + input_rate as u64 / 2;
        ((numerator / input_rate as u64) as usize).max(1)
    }

    /// Create a rubato resampler.
    ///
    /// Uses FastFixedIn with a septic polynomial: good quality at low cost.
    /// The whole buffer is processed as a single chunk.
    fn create_resampler(
        input_rate: u32,
        output_rate: u32,
        channels: u16,
        chunk_size: usize,
    ) -> Result<FastFixedIn<f32>> {
        FastFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            1.0, // max_relative_ratio (no runtime changes)
            PolynomialDegree::Septic,
            chunk_size,
            channels as usize,
        )
        .map_err(|e| Error::mix(MixStage::Resample, format!("Failed to create resampler: {}", e)))
    }

    /// Convert interleaved samples to planar format.
    ///
    /// Input:  [L, R, L, R, L, R, ...]
    /// Output: [[L, L, L, ...], [R, R, R, ...]]
    fn deinterleave(samples: &[f32], channels: u16) -> Vec<Vec<f32>> {
        let num_channels = channels as usize;
        let num_frames = samples.len() / num_channels;

        let mut planar = vec![Vec::with_capacity(num_frames); num_channels];

        for frame in samples.chunks_exact(num_channels) {
            for (ch_idx, &sample) in frame.iter().enumerate() {
                planar[ch_idx].push(sample);
            }
        }

        planar
    }

    /// Convert planar samples to interleaved format.
    ///
    /// Input:  [[L, L, L, ...], [R, R, R, ...]]
    /// Output: [L, R, L, R, L, R, ...]
    fn interleave(planar: Vec<Vec<f32>>) -> Vec<f32> {
        if planar.is_empty() {
            return Vec::new();
        }

        let num_channels = planar.len();
        let num_frames = planar[0].len();
        let mut interleaved = Vec::with_capacity(num_frames * num_channels);

        for frame_idx in 0..num_frames {
            for channel in &planar {
                interleaved.push(channel[frame_idx]);
            }
        }

        interleaved
    }
}
