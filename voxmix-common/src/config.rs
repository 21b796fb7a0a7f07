//! Configuration loading and config file resolution
//!
//! Settings come from an optional TOML file. The file location is resolved in
//! priority order:
//! 1. Command-line argument (highest priority)
//! 2. `VOXMIX_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/voxmix/config.toml`)
//! 4. None: compiled defaults are used
//!
//! A missing file is not an error. A file that exists but fails to parse is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "VOXMIX_CONFIG";

/// Settings read from the TOML config file
///
/// Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,

    /// Where presets are stored
    pub presets_file: PathBuf,

    /// External encoder executable
    pub ffmpeg_path: PathBuf,

    /// External speech synthesis executable (edge-tts compatible)
    pub tts_command: PathBuf,

    /// MP3 constant target bitrate
    pub mp3_bitrate_kbps: u32,

    /// MP3 quality parameter passed to the encoder (0 = best)
    pub mp3_quality: u8,

    pub default_volume_percent: u8,
    pub default_fade_in: bool,
    pub default_fade_out: bool,

    /// Upper bound for a single render/mix/preview call
    pub timeout_secs: u64,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            log_level: "voxmix=info,voxmix_engine=info,voxmix_common=info".to_string(),
            presets_file: default_presets_file(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            tts_command: PathBuf::from("edge-tts"),
            mp3_bitrate_kbps: 192,
            mp3_quality: 2,
            default_volume_percent: 30,
            default_fade_in: true,
            default_fade_out: true,
            timeout_secs: 300,
        }
    }
}

impl TomlConfig {
    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<()> {
        if self.default_volume_percent > 100 {
            return Err(Error::Config(format!(
                "default_volume_percent must be 0-100, got {}",
                self.default_volume_percent
            )));
        }
        if self.mp3_bitrate_kbps == 0 {
            return Err(Error::Config("mp3_bitrate_kbps must be positive".to_string()));
        }
        if self.mp3_quality > 9 {
            return Err(Error::Config(format!(
                "mp3_quality must be 0-9, got {}",
                self.mp3_quality
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Resolve which config file to read, if any.
///
/// Explicitly named files (CLI or environment) are returned even when they do
/// not exist so the caller can report them; the platform default is only
/// returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir()
        .map(|d| d.join("voxmix").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load configuration following the resolution order.
///
/// A resolved path that does not exist logs a warning and yields defaults.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            TomlConfig::from_file(&path)
        }
        Some(path) => {
            warn!("Config file {} not found, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// OS-dependent default location of the presets file
fn default_presets_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("voxmix").join("tts_presets.json"))
        .unwrap_or_else(|| PathBuf::from("tts_presets.json"))
}
