//! Render pipeline: synthesis -> load -> (preview) -> mix -> encode
//!
//! Each call stages its own temp files and releases them before returning.
//! A failing stage aborts the whole render; no partial output is produced.

use crate::audio::{AudioBuffer, Encoder, Format, TrackLoader};
use crate::error::Result;
use crate::mix::{self, MixParameters};
use crate::staging;
use crate::synth::{SpeechSynthesizer, SynthesisRequest};
use std::path::Path;
use tracing::{info, warn};

/// Background music handed over as raw bytes (e.g. an upload)
#[derive(Debug, Clone)]
pub struct MusicInput {
    pub bytes: Vec<u8>,

    /// Original file extension, used to resolve the container format
    pub extension: String,
}

/// One text-to-speech render
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub request: SynthesisRequest,
    pub music: Option<MusicInput>,
    pub params: MixParameters,

    /// Run the diagnostic preview before the full mix
    pub check_first: bool,
}

/// Result of a render
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Encoded output
    pub bytes: Vec<u8>,

    pub duration_ms: f64,

    /// Whether music was mixed in
    pub mixed: bool,

    /// Encoded preview clip, when requested and successful
    pub preview: Option<Vec<u8>>,
}

/// Synthesize the voice and mix it with optional background music.
///
/// Music is skipped when absent or at 0% volume; the voice alone is encoded.
pub fn render(
    job: &RenderJob,
    synthesizer: &dyn SpeechSynthesizer,
    encoder: &dyn Encoder,
) -> Result<RenderOutput> {
    job.request.validate()?;
    job.params.validate()?;

    let voice_ext = synthesizer.output_extension();
    let voice_file = staging::stage_empty(voice_ext)?;
    synthesizer.synthesize(&job.request, voice_file.path())?;
    let voice = TrackLoader::load_file(voice_file.path(), Format::from_extension(voice_ext))?;

    let music = match &job.music {
        Some(music) if job.params.volume_percent > 0 => music,
        _ => {
            info!("Rendering voice without background music");
            return Ok(RenderOutput {
                bytes: encoder.encode(&voice)?,
                duration_ms: voice.duration_ms(),
                mixed: false,
                preview: None,
            });
        }
    };

    let music_file = staging::stage_bytes(&music.bytes, &music.extension)?;
    let music = TrackLoader::load_path(music_file.path())?;

    let preview = if job.check_first {
        checked_preview(&voice, &music, encoder)
    } else {
        None
    };

    let mixed = mix::mix(&voice, &music, &job.params)?;
    info!("Mixed output: {:.0}ms", mixed.duration_ms());

    Ok(RenderOutput {
        bytes: encoder.encode(&mixed)?,
        duration_ms: mixed.duration_ms(),
        mixed: true,
        preview,
    })
}

/// Preview whose failure is reported but never fatal
fn checked_preview(voice: &AudioBuffer, music: &AudioBuffer, encoder: &dyn Encoder) -> Option<Vec<u8>> {
    match mix::preview(voice, music).and_then(|clip| encoder.encode(&clip)) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Audio test failed ({}): {}", e.kind(), e);
            None
        }
    }
}

/// Mix two existing files and encode the result
pub fn mix_files(
    voice_path: &Path,
    music_path: &Path,
    params: &MixParameters,
    encoder: &dyn Encoder,
) -> Result<Vec<u8>> {
    let voice = TrackLoader::load_path(voice_path)?;
    let music = TrackLoader::load_path(music_path)?;
    let mixed = mix::mix(&voice, &music, params)?;
    encoder.encode(&mixed)
}

/// Build and encode a preview clip from two existing files
pub fn preview_files(voice_path: &Path, music_path: &Path, encoder: &dyn Encoder) -> Result<Vec<u8>> {
    let voice = TrackLoader::load_path(voice_path)?;
    let music = TrackLoader::load_path(music_path)?;
    let clip = mix::preview(&voice, &music)?;
    encoder.encode(&clip)
}

/// Output file name from a user-entered base name ("output" when blank)
pub fn output_file_name(user_name: &str, encoder: &dyn Encoder) -> String {
    let base = user_name.trim();
    let base = if base.is_empty() { "output" } else { base };
    format!("{}.{}", base, encoder.extension())
}
