//! Error types for voxmix-engine
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use std::fmt;
use thiserror::Error;

/// Mixing pipeline stage, used to tag mix failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixStage {
    Validate,
    Resample,
    Remap,
    Gain,
    Loop,
    Fade,
    Overlay,
}

impl fmt::Display for MixStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MixStage::Validate => "validate",
            MixStage::Resample => "resample",
            MixStage::Remap => "remap",
            MixStage::Gain => "gain",
            MixStage::Loop => "loop",
            MixStage::Fade => "fade",
            MixStage::Overlay => "overlay",
        };
        f.write_str(name)
    }
}

/// Main error type for voxmix-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Unreadable, corrupted, or unsupported audio container
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio decoded (or was handed over) with zero frames
    #[error("Empty audio: {0}")]
    EmptyAudio(String),

    /// Failure inside the mixing pipeline
    #[error("Mix error during {stage}: {message}")]
    Mix { stage: MixStage, message: String },

    /// Buffer construction with inconsistent metadata
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// Output encoding failure
    #[error("Audio encode error: {0}")]
    Encode(String),

    /// Speech synthesis failure
    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    /// Operation exceeded its time limit
    #[error("Timed out: {0}")]
    Timeout(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or preset errors
    #[error(transparent)]
    Config(#[from] voxmix_common::Error),
}

impl Error {
    /// Shorthand for a stage-tagged mix failure
    pub fn mix(stage: MixStage, message: impl Into<String>) -> Self {
        Error::Mix {
            stage,
            message: message.into(),
        }
    }

    /// Stable short name of the error kind, for structured reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Decode(_) => "decode",
            Error::EmptyAudio(_) => "empty_audio",
            Error::Mix { .. } => "mix",
            Error::InvalidBuffer(_) => "invalid_buffer",
            Error::Encode(_) => "encode",
            Error::Synthesis(_) => "synthesis",
            Error::Timeout(_) => "timeout",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
        }
    }
}

/// Convenience Result type using voxmix-engine Error
pub type Result<T> = std::result::Result<T, Error>;
