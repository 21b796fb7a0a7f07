//! Scoped temporary files around the engine
//!
//! Inputs handed over as bytes (uploads) and intermediate files (synthesized
//! voice) are staged in named temp files. The file is removed when the
//! [`StagedFile`] is dropped, on success and error paths alike.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A temp file that is deleted on drop
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the staged content in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(std::fs::metadata(self.path())?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        debug!("Releasing staged file {}", self.file.path().display());
    }
}

/// Reserve an empty staged file whose name ends in `.{extension}`.
///
/// The extension matters: the loader resolves the format from it.
pub fn stage_empty(extension: &str) -> Result<StagedFile> {
    let suffix = suffix_for(extension);
    let file = tempfile::Builder::new()
        .prefix("voxmix-")
        .suffix(&suffix)
        .tempfile()?;
    debug!("Staged {}", file.path().display());
    Ok(StagedFile { file })
}

/// Write `bytes` to a new staged file ending in `.{extension}`
pub fn stage_bytes(bytes: &[u8], extension: &str) -> Result<StagedFile> {
    let mut staged = stage_empty(extension)?;
    staged.file.write_all(bytes)?;
    staged.file.flush()?;
    Ok(staged)
}

fn suffix_for(extension: &str) -> String {
    let ext = extension.trim().trim_start_matches('.');
    if ext.is_empty() {
        String::new()
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_file_removed_on_drop() {
        let staged = stage_bytes(b"abc", "wav").unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(staged.len().unwrap(), 3);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_removed_when_error_propagates() {
        fn failing(path_out: &mut Option<std::path::PathBuf>) -> Result<()> {
            let staged = stage_empty("mp3")?;
            *path_out = Some(staged.path().to_path_buf());
            Err(crate::error::Error::Decode("boom".to_string()))
        }

        let mut path = None;
        assert!(failing(&mut path).is_err());
        assert!(!path.unwrap().exists());
    }

    #[test]
    fn test_suffix_normalization() {
        assert_eq!(suffix_for("mp3"), ".mp3");
        assert_eq!(suffix_for(".WAV"), ".WAV");
        assert_eq!(suffix_for(""), "");
    }

    #[test]
    fn test_empty_stage() {
        let staged = stage_empty("mp3").unwrap();
        assert!(staged.is_empty().unwrap());
    }
}
