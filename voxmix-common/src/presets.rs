//! Voice preset persistence
//!
//! A preset is the last-used voice, speaking rate, and pitch, stored as a flat
//! JSON object. Loading never fails: a missing or unreadable file yields the
//! defaults so startup is never blocked by a bad preset file.

use crate::voices;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Allowed speaking rate range (percent of normal speed)
pub const RATE_RANGE: std::ops::RangeInclusive<u32> = 50..=150;

/// Allowed pitch adjustment range (percent)
pub const PITCH_RANGE: std::ops::RangeInclusive<i32> = -20..=20;

/// Saved voice settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Voice catalog label
    pub voice: String,

    /// Speaking rate in percent (100 = normal)
    pub rate: u32,

    /// Pitch adjustment in percent (0 = unchanged)
    pub pitch: i32,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            voice: voices::default_voice().label.to_string(),
            rate: 100,
            pitch: 0,
        }
    }
}

impl Preset {
    /// Check rate, pitch and voice label against the allowed values
    pub fn validate(&self) -> Result<()> {
        if voices::lookup(&self.voice).is_none() {
            return Err(Error::InvalidInput(format!("Unknown voice: {}", self.voice)));
        }
        if !RATE_RANGE.contains(&self.rate) {
            return Err(Error::InvalidInput(format!(
                "Rate {}% outside {}..={}",
                self.rate,
                RATE_RANGE.start(),
                RATE_RANGE.end()
            )));
        }
        if !PITCH_RANGE.contains(&self.pitch) {
            return Err(Error::InvalidInput(format!(
                "Pitch {}% outside {}..={}",
                self.pitch,
                PITCH_RANGE.start(),
                PITCH_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// Load the preset stored at `path`.
///
/// Returns the defaults when the file does not exist. Read, parse and
/// validation failures are logged as warnings and also fall back to the
/// defaults.
pub fn load(path: &Path) -> Preset {
    if !path.exists() {
        debug!("No preset file at {}, using defaults", path.display());
        return Preset::default();
    }

    match try_load(path) {
        Ok(preset) => {
            debug!("Loaded preset from {}: {:?}", path.display(), preset);
            preset
        }
        Err(e) => {
            warn!("Could not load presets from {}: {}", path.display(), e);
            Preset::default()
        }
    }
}

fn try_load(path: &Path) -> Result<Preset> {
    let content = std::fs::read_to_string(path)?;
    let preset: Preset = serde_json::from_str(&content)?;
    preset.validate()?;
    Ok(preset)
}

/// Save a preset to `path`, creating parent directories as needed.
pub fn save(path: &Path, preset: &Preset) -> Result<()> {
    preset.validate()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(preset)?;
    std::fs::write(path, json)?;
    debug!("Saved preset to {}", path.display());
    Ok(())
}
