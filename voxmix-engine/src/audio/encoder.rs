//! Output encoders
//!
//! The engine produces PCM; turning it into a file is delegated to an
//! [`Encoder`]. WAV is written in-process with hound. MP3 is produced by an
//! external ffmpeg process with a fixed, configurable profile.

use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use crate::process::{self, ProcessError};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Default MP3 constant target bitrate (kbps)
pub const DEFAULT_MP3_BITRATE_KBPS: u32 = 192;

/// Default MP3 quality parameter (`-q:a`, 0 = best, 9 = worst)
pub const DEFAULT_MP3_QUALITY: u8 = 2;

/// Turns a PCM buffer into container bytes
pub trait Encoder: Send + Sync {
    fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>>;

    /// File extension of the produced container (without dot)
    fn extension(&self) -> &'static str;
}

/// 16-bit PCM WAV encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder;

impl Encoder for WavEncoder {
    fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: buffer.channel_count(),
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.samples().len() * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, spec)
                .map_err(|e| Error::Encode(format!("Failed to start WAV stream: {}", e)))?;
            for &sample in buffer.samples() {
                let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer
                    .write_sample(value)
                    .map_err(|e| Error::Encode(format!("Failed to write WAV sample: {}", e)))?;
            }
            writer
                .finalize()
                .map_err(|e| Error::Encode(format!("Failed to finalize WAV: {}", e)))?;
        }

        Ok(cursor.into_inner())
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}

/// MP3 encoder backed by an external ffmpeg (libmp3lame) process
#[derive(Debug, Clone)]
pub struct Mp3Encoder {
    program: PathBuf,
    bitrate_kbps: u32,
    quality: u8,
    timeout: Option<Duration>,
}

impl Mp3Encoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            bitrate_kbps: DEFAULT_MP3_BITRATE_KBPS,
            quality: DEFAULT_MP3_QUALITY,
            timeout: None,
        }
    }

    pub fn with_bitrate_kbps(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Kill the encoder process if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Arguments: WAV on stdin, MP3 on stdout
    fn args(&self) -> Vec<String> {
        [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "wav",
            "-i",
            "pipe:0",
            "-codec:a",
            "libmp3lame",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain([
            "-b:a".to_string(),
            format!("{}k", self.bitrate_kbps),
            "-q:a".to_string(),
            self.quality.to_string(),
            "-f".to_string(),
            "mp3".to_string(),
            "pipe:1".to_string(),
        ])
        .collect()
    }
}

impl Encoder for Mp3Encoder {
    fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>> {
        let wav = WavEncoder.encode(buffer)?;

        debug!(
            "Encoding {} frames to MP3 via {} ({}k, q={})",
            buffer.frame_count(),
            self.program.display(),
            self.bitrate_kbps,
            self.quality
        );

        let mut command = Command::new(&self.program);
        command.args(self.args());

        let output = process::run(command, Some(wav), self.timeout).map_err(|e| match e {
            ProcessError::TimedOut(limit) => Error::Timeout(format!(
                "{} did not finish within {}s",
                self.program.display(),
                limit.as_secs_f64()
            )),
            other => Error::Encode(format!("{}: {}", self.program.display(), other)),
        })?;

        if !output.status.success() {
            return Err(Error::Encode(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(Error::Encode("encoder produced no output".to_string()));
        }

        Ok(output.stdout)
    }

    fn extension(&self) -> &'static str {
        "mp3"
    }
}
