//! Voice + music mixing
//!
//! - [`mixer`]: full-length mix (alignment, gain, looping, fades, overlay)
//! - [`preview`]: short diagnostic mix of the first seconds of both tracks
//! - [`gain`], [`fader`]: the amplitude transforms both build on

pub mod fader;
pub mod gain;
pub mod mixer;
pub mod preview;

pub use mixer::{mix, MixParameters};
pub use preview::preview;
