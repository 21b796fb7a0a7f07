//! Declared container formats
//!
//! The format is resolved once, from a file extension, when a track is loaded.

use std::fmt;
use std::path::Path;

/// Container format a track is declared to be in.
///
/// `Probe` means "not one of the known formats": the loader inspects the
/// bytes and accepts any container it recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Mp3,
    Wav,
    Probe,
}

impl Format {
    /// Resolve an extension token (case-insensitive, leading dot allowed)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Format::Mp3,
            "wav" | "wave" => Format::Wav,
            _ => Format::Probe,
        }
    }

    /// Resolve from a path's extension; no extension means `Probe`
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Format::Probe)
    }

    /// Extension handed to the container probe as a hint
    pub(crate) fn hint_extension(&self) -> Option<&'static str> {
        match self {
            Format::Mp3 => Some("mp3"),
            Format::Wav => Some("wav"),
            Format::Probe => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Mp3 => "mp3",
            Format::Wav => "wav",
            Format::Probe => "probed",
        };
        f.write_str(name)
    }
}
