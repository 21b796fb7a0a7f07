//! # Voxmix Engine Library (voxmix-engine)
//!
//! Combines a synthesized speech track with a background music track.
//!
//! **Purpose:** Decode voice and music, align music to the voice's format,
//! apply volume gain and fade envelopes, match durations, and overlay the two
//! into one output track.
//!
//! **Architecture:** Decode with symphonia, resample with rubato, encode via
//! hound (WAV) or an external encoder process (MP3). Every transform takes
//! buffers by reference and returns a new owned buffer.

pub mod audio;
pub mod error;
pub mod mix;
pub mod pipeline;
mod process;
pub mod staging;
pub mod synth;

pub use audio::{AudioBuffer, Format};
pub use error::{Error, MixStage, Result};
pub use mix::{mix, preview, MixParameters};
