//! Audio buffers, decoding, format conversion, and encoding

pub mod channels;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod resampler;
pub mod types;

pub use decoder::TrackLoader;
pub use encoder::{Encoder, Mp3Encoder, WavEncoder};
pub use format::Format;
pub use types::AudioBuffer;
