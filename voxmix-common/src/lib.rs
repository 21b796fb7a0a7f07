//! # Voxmix Common Library
//!
//! Shared code for the voxmix engine and command-line tool:
//! - Configuration file loading and resolution
//! - Voice catalog for speech synthesis
//! - Preset persistence (voice/rate/pitch)

pub mod config;
pub mod error;
pub mod presets;
pub mod voices;

pub use error::{Error, Result};
pub use presets::Preset;
pub use voices::Voice;
