//! Short diagnostic mix
//!
//! Overlays the first few seconds of music (at a fixed -20 dB) onto the voice
//! so alignment can be checked by ear before committing to a full mix. No
//! looping and no fades: music shorter than the clip only covers its own length.

use crate::audio::resampler::Resampler;
use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::mix::gain::apply_gain;
use crate::mix::mixer::{align_to, ensure_not_empty, overlay};
use tracing::debug;

/// Maximum preview length
pub const PREVIEW_DURATION_MS: u64 = 5000;

/// Fixed music gain used by the preview (ignores the volume setting)
pub const PREVIEW_GAIN_DB: f64 = -20.0;

/// Build a preview clip of min(voice duration, 5 s).
///
/// The output has the voice's sample rate and channel count.
pub fn preview(voice: &AudioBuffer, music: &AudioBuffer) -> Result<AudioBuffer> {
    ensure_not_empty(voice, "voice")?;
    ensure_not_empty(music, "music")?;

    let clip_frames = voice
        .frames_for_ms(PREVIEW_DURATION_MS)
        .min(voice.frame_count());
    let voice_clip = voice.slice_frames(0, clip_frames);

    // Cut the music at its own rate before aligning, with one frame of slack
    // for rounding, so only the clip is resampled
    let music_source_frames =
        Resampler::expected_frames(clip_frames, voice.sample_rate(), music.sample_rate()) + 1;
    let music_clip = align_to(&music.slice_frames(0, music_source_frames), voice)?
        .slice_frames(0, clip_frames);

    debug!(
        "Preview: {} voice frames, {} music frames at {} dB",
        voice_clip.frame_count(),
        music_clip.frame_count(),
        PREVIEW_GAIN_DB
    );

    overlay(&voice_clip, &apply_gain(&music_clip, PREVIEW_GAIN_DB))
}
