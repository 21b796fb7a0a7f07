//! Speech synthesis seam
//!
//! The engine does not synthesize speech itself. A [`SpeechSynthesizer`]
//! writes the voice track to a file; [`EdgeTtsCommand`] does so by running an
//! edge-tts compatible command-line tool.

use crate::error::{Error, Result};
use crate::process::{self, ProcessError};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// What to say and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,

    /// Backend voice identifier, e.g. "en-US-JennyNeural"
    pub voice_id: String,

    /// Speaking rate in percent (100 = normal)
    pub rate_percent: u32,

    /// Pitch adjustment in percent (0 = unchanged)
    pub pitch_percent: i32,
}

impl SynthesisRequest {
    /// Rate as a signed offset from normal speed, e.g. "+25%" or "-10%"
    pub fn rate_offset(&self) -> String {
        format!("{:+}%", self.rate_percent as i64 - 100)
    }

    /// Pitch as a signed offset, e.g. "+5Hz"
    pub fn pitch_offset(&self) -> String {
        format!("{:+}Hz", self.pitch_percent)
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::Synthesis("no text to synthesize".to_string()));
        }
        if self.voice_id.trim().is_empty() {
            return Err(Error::Synthesis("no voice selected".to_string()));
        }
        Ok(())
    }
}

/// Produces a voice audio file from text
pub trait SpeechSynthesizer: Send + Sync {
    /// Write the synthesized voice to `output`.
    ///
    /// The container format is whatever `output_extension` reports.
    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<()>;

    fn output_extension(&self) -> &'static str {
        "mp3"
    }
}

/// Runs an edge-tts compatible executable
#[derive(Debug, Clone)]
pub struct EdgeTtsCommand {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl EdgeTtsCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the tool if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn args(request: &SynthesisRequest, output: &Path) -> Vec<String> {
        vec![
            "--voice".to_string(),
            request.voice_id.clone(),
            format!("--rate={}", request.rate_offset()),
            format!("--pitch={}", request.pitch_offset()),
            "--text".to_string(),
            request.text.clone(),
            "--write-media".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }
}

impl SpeechSynthesizer for EdgeTtsCommand {
    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<()> {
        request.validate()?;

        info!(
            "Synthesizing {} chars with {} (rate {}, pitch {})",
            request.text.chars().count(),
            request.voice_id,
            request.rate_offset(),
            request.pitch_offset()
        );

        let mut command = Command::new(&self.program);
        command.args(Self::args(request, output));

        let result = process::run(command, None, self.timeout).map_err(|e| match e {
            ProcessError::TimedOut(limit) => Error::Timeout(format!(
                "{} did not finish within {}s",
                self.program.display(),
                limit.as_secs_f64()
            )),
            other => Error::Synthesis(format!("{}: {}", self.program.display(), other)),
        })?;

        if !result.status.success() {
            return Err(Error::Synthesis(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        let written = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(Error::Synthesis(format!(
                "{} produced no audio",
                self.program.display()
            )));
        }

        debug!("Synthesized {} bytes to {}", written, output.display());
        Ok(())
    }
}
