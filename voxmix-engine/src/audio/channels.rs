//! Channel layout conversion between mono and stereo

use crate::audio::types::AudioBuffer;
use crate::error::{Error, MixStage, Result};
use tracing::debug;

/// Convert `buffer` to `target_channels` (1 or 2).
///
/// - mono -> stereo: each sample is duplicated to both channels
/// - stereo -> mono: each frame is the average of left and right
/// - same layout: returns a copy
pub fn remap(buffer: &AudioBuffer, target_channels: u16) -> Result<AudioBuffer> {
    let source_channels = buffer.channel_count();

    let samples = match (source_channels, target_channels) {
        (from, to) if from == to => return Ok(buffer.clone()),
        (1, 2) => mono_to_stereo(buffer.samples()),
        (2, 1) => stereo_to_mono(buffer.samples()),
        (from, to) => {
            return Err(Error::mix(
                MixStage::Remap,
                format!("unsupported channel conversion {} -> {}", from, to),
            ))
        }
    };

    debug!(
        "Remapped {} frames from {} to {} channels",
        buffer.frame_count(),
        source_channels,
        target_channels
    );

    AudioBuffer::new(samples, buffer.sample_rate(), target_channels)
        .map_err(|e| Error::mix(MixStage::Remap, e.to_string()))
}

/// [M, M, M] -> [M, M, M, M, M, M]
fn mono_to_stereo(samples: &[f32]) -> Vec<f32> {
    samples.iter().flat_map(|&s| [s, s]).collect()
}

/// [L, R, L, R] -> [(L+R)/2, (L+R)/2]
fn stereo_to_mono(samples: &[f32]) -> Vec<f32> {
    samples
        .chunks_exact(2)
        .map(|frame| (frame[0] + frame[1]) * 0.5)
        .collect()
}
