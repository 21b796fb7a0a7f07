//! Track loader using symphonia
//!
//! Decodes MP3, WAV, or any probe-recognized container into an [`AudioBuffer`]
//! that keeps the source's sample rate and channel layout.

use crate::audio::format::Format;
use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, Probe};
use tracing::{debug, warn};

/// Probe that only accepts MPEG audio streams
fn mp3_probe() -> &'static Probe {
    static PROBE: OnceLock<Probe> = OnceLock::new();
    PROBE.get_or_init(|| {
        let mut probe = Probe::default();
        probe.register_all::<symphonia::default::formats::MpaReader>();
        probe
    })
}

/// Probe that only accepts RIFF WAVE containers
fn wav_probe() -> &'static Probe {
    static PROBE: OnceLock<Probe> = OnceLock::new();
    PROBE.get_or_init(|| {
        let mut probe = Probe::default();
        probe.register_all::<symphonia::default::formats::WavReader>();
        probe
    })
}

fn probe_for(format: Format) -> &'static Probe {
    match format {
        Format::Mp3 => mp3_probe(),
        Format::Wav => wav_probe(),
        Format::Probe => symphonia::default::get_probe(),
    }
}

/// Decodes audio tracks into PCM buffers.
pub struct TrackLoader;

impl TrackLoader {
    /// Load a file, resolving its format from the file extension.
    pub fn load_path(path: &Path) -> Result<AudioBuffer> {
        Self::load_file(path, Format::from_path(path))
    }

    /// Load a file in a declared format.
    ///
    /// # Errors
    /// - `Decode`: file missing/unreadable, empty, or not a `format` container
    /// - `EmptyAudio`: the container decodes to zero frames
    pub fn load_file(path: &Path, format: Format) -> Result<AudioBuffer> {
        debug!("Loading {} as {}", path.display(), format);

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open file {}: {}", path.display(), e)))?;

        let len = file
            .metadata()
            .map_err(|e| Error::Decode(format!("Failed to stat {}: {}", path.display(), e)))?
            .len();
        if len == 0 {
            return Err(Error::Decode(format!("{} is empty (0 bytes)", path.display())));
        }

        Self::decode_source(Box::new(file), format, &path.display().to_string())
    }

    /// Load in-memory bytes in a declared format.
    pub fn load_bytes(bytes: Vec<u8>, format: Format) -> Result<AudioBuffer> {
        if bytes.is_empty() {
            return Err(Error::Decode("input is empty (0 bytes)".to_string()));
        }
        Self::decode_source(Box::new(Cursor::new(bytes)), format, "<memory>")
    }

    fn decode_source(source: Box<dyn MediaSource>, format: Format, origin: &str) -> Result<AudioBuffer> {
        let mss = MediaSourceStream::new(source, Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = format.hint_extension() {
            hint.with_extension(ext);
        }

        let probed = probe_for(format)
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| {
                Error::Decode(format!("{}: not a recognized {} container: {}", origin, format, e))
            })?;

        let mut reader = probed.format;

        // Get the default audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode(format!("{}: no audio track found", origin)))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("{}: unsupported codec: {}", origin, e)))?;

        // Container metadata may be incomplete (e.g. bare MP3); the first
        // decoded packet fills in whatever is missing.
        let mut sample_rate = codec_params.sample_rate;
        let mut channels = codec_params.channels.map(|c| c.count());

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!("Reached end of stream");
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) if samples.is_empty() => {
                    return Err(Error::Decode(format!("{}: failed to read packet: {}", origin, e)));
                }
                Err(e) => {
                    warn!("{}: stopping at unreadable packet: {}", origin, e);
                    break;
                }
            };

            // Skip packets for other tracks
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("{}: skipping corrupt packet: {}", origin, e);
                    continue;
                }
                Err(e) => {
                    return Err(Error::Decode(format!("{}: decode failed: {}", origin, e)));
                }
            };

            let spec = *decoded.spec();
            let packet_channels = spec.channels.count();
            sample_rate.get_or_insert(spec.rate);
            if *channels.get_or_insert(packet_channels) != packet_channels {
                return Err(Error::Decode(format!(
                    "{}: channel layout changed mid-stream",
                    origin
                )));
            }

            if decoded.frames() == 0 {
                continue;
            }

            let needed = decoded.capacity() * packet_channels;
            if sample_buf.as_ref().map_or(true, |b| b.capacity() < needed) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        let sample_rate = sample_rate
            .ok_or_else(|| Error::Decode(format!("{}: sample rate not found", origin)))?;
        let channels = channels
            .ok_or_else(|| Error::Decode(format!("{}: channel count not found", origin)))?;

        if !(1..=2).contains(&channels) {
            return Err(Error::Decode(format!(
                "{}: {} channels not supported (mono or stereo only)",
                origin, channels
            )));
        }

        if samples.is_empty() {
            return Err(Error::EmptyAudio(format!("{} decoded to zero frames", origin)));
        }

        let buffer = AudioBuffer::new(samples, sample_rate, channels as u16)?;

        debug!(
            "Decoded {}: sample_rate={}, channels={}, frames={} ({:.0}ms)",
            origin,
            buffer.sample_rate(),
            buffer.channel_count(),
            buffer.frame_count(),
            buffer.duration_ms()
        );

        Ok(buffer)
    }
}
