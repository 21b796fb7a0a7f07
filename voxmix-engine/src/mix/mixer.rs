//! Full-length voice + music mixing
//!
//! The pipeline runs in a fixed order:
//! 1. zero-volume shortcut (voice returned unchanged)
//! 2. music aligned to the voice's sample rate, then channel layout
//! 3. volume gain
//! 4. music looped and/or truncated to the voice's exact frame count
//! 5. fade-in / fade-out over the duration-matched music
//! 6. overlay onto the voice with clipping
//!
//! Inputs are never modified and nothing is returned unless every stage succeeds.

use crate::audio::channels;
use crate::audio::resampler::Resampler;
use crate::audio::AudioBuffer;
use crate::error::{Error, MixStage, Result};
use crate::mix::fader::{self, FADE_DURATION_MS};
use crate::mix::gain::{apply_gain, volume_to_db};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Mixing controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixParameters {
    /// Music volume, 0-100 (0 skips the music entirely)
    pub volume_percent: u8,

    /// Ramp the music in over the first 3 seconds
    pub fade_in: bool,

    /// Ramp the music out over the last 3 seconds
    pub fade_out: bool,
}

impl Default for MixParameters {
    fn default() -> Self {
        Self {
            volume_percent: 30,
            fade_in: true,
            fade_out: true,
        }
    }
}

impl MixParameters {
    pub fn new(volume_percent: u8, fade_in: bool, fade_out: bool) -> Self {
        Self {
            volume_percent,
            fade_in,
            fade_out,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.volume_percent > 100 {
            return Err(Error::mix(
                MixStage::Validate,
                format!("volume must be 0-100%, got {}%", self.volume_percent),
            ));
        }
        Ok(())
    }
}

/// Mix `music` under `voice`.
///
/// # Returns
/// A buffer with the voice's sample rate, channel count, and exact frame count.
///
/// # Errors
/// - `EmptyAudio`: either input has zero frames (checked before any work)
/// - `Mix`: invalid parameters or a failing resample/remap/overlay stage
pub fn mix(voice: &AudioBuffer, music: &AudioBuffer, params: &MixParameters) -> Result<AudioBuffer> {
    ensure_not_empty(voice, "voice")?;
    ensure_not_empty(music, "music")?;
    params.validate()?;

    if params.volume_percent == 0 {
        info!("Music volume is 0%, returning voice track unchanged");
        return Ok(voice.clone());
    }

    info!(
        "Mixing voice ({:.0}ms, {}Hz, {}ch) with music ({:.0}ms, {}Hz, {}ch) at {}%",
        voice.duration_ms(),
        voice.sample_rate(),
        voice.channel_count(),
        music.duration_ms(),
        music.sample_rate(),
        music.channel_count(),
        params.volume_percent
    );

    let aligned = align_to(music, voice)?;

    let gain_db = volume_to_db(params.volume_percent);
    debug!("Applying {:.2} dB music gain", gain_db);
    let gained = apply_gain(&aligned, gain_db);

    let mut shaped = match_length(&gained, voice.frame_count())?;

    if params.fade_in {
        shaped = fader::fade_in(&shaped, FADE_DURATION_MS);
    }
    if params.fade_out {
        shaped = fader::fade_out(&shaped, FADE_DURATION_MS);
    }

    overlay(voice, &shaped)
}

/// Reject zero-frame inputs
pub(crate) fn ensure_not_empty(buffer: &AudioBuffer, role: &str) -> Result<()> {
    if buffer.frame_count() == 0 {
        return Err(Error::EmptyAudio(format!("{} track has no audio frames", role)));
    }
    Ok(())
}

/// Convert `music` to `reference`'s sample rate and channel layout
pub(crate) fn align_to(music: &AudioBuffer, reference: &AudioBuffer) -> Result<AudioBuffer> {
    let resampled = if music.sample_rate() != reference.sample_rate() {
        Resampler::resample(music, reference.sample_rate())?
    } else {
        music.clone()
    };

    if resampled.channel_count() != reference.channel_count() {
        channels::remap(&resampled, reference.channel_count())
    } else {
        Ok(resampled)
    }
}

/// Loop `music` by whole repetitions until it covers `target_frames`, then
/// truncate to exactly `target_frames`. Longer music is truncated directly.
///
/// Repetitions are raw concatenations; there is no crossfade at the seams.
pub fn match_length(music: &AudioBuffer, target_frames: usize) -> Result<AudioBuffer> {
    let music_frames = music.frame_count();
    if music_frames == 0 {
        return Err(Error::mix(MixStage::Loop, "cannot loop an empty music track"));
    }

    let channels = music.channel_count() as usize;
    let target_samples = target_frames * channels;

    if music_frames >= target_frames {
        return Ok(music.with_samples(music.samples()[..target_samples].to_vec()));
    }

    let repetitions = target_frames.div_ceil(music_frames);
    debug!(
        "Looping music {}x ({} frames) to cover {} frames",
        repetitions, music_frames, target_frames
    );

    let mut samples = Vec::with_capacity(repetitions * music.samples().len());
    for _ in 0..repetitions {
        samples.extend_from_slice(music.samples());
    }
    samples.truncate(target_samples);

    Ok(music.with_samples(samples))
}

/// Sum `layer` onto `base` sample by sample, clipping to [-1.0, 1.0].
///
/// The result has `base`'s format and length. Where `layer` is shorter, the
/// remaining frames are `base` alone (clipped).
pub fn overlay(base: &AudioBuffer, layer: &AudioBuffer) -> Result<AudioBuffer> {
    if base.sample_rate() != layer.sample_rate() || base.channel_count() != layer.channel_count() {
        return Err(Error::mix(
            MixStage::Overlay,
            format!(
                "format mismatch: {}Hz/{}ch vs {}Hz/{}ch",
                base.sample_rate(),
                base.channel_count(),
                layer.sample_rate(),
                layer.channel_count()
            ),
        ));
    }

    let mut clipped = 0usize;
    let samples = base
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            let sum = b + layer.samples().get(i).copied().unwrap_or(0.0);
            if !(-1.0..=1.0).contains(&sum) {
                clipped += 1;
            }
            sum.clamp(-1.0, 1.0)
        })
        .collect();

    if clipped > 0 {
        debug!("Overlay clipped {} samples", clipped);
    }

    Ok(base.with_samples(samples))
}
