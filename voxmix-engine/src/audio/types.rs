//! Core audio data types
//!
//! Defines the PCM buffer passed between the loader, the mixer and the encoders.

use crate::error::{Error, Result};

/// Decoded PCM audio.
///
/// **Format:**
/// - Samples are f32 (floating point -1.0 to 1.0)
/// - Interleaved by frame: [L, R, L, R, ...] for stereo, [M, M, ...] for mono
/// - `samples.len()` is always an exact multiple of `channel_count`
///
/// Buffers are never edited in place by the mixing pipeline; every transform
/// returns a new buffer and leaves its input untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channel_count: u16,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples.
    ///
    /// # Errors
    /// - `sample_rate` is zero
    /// - `channel_count` is not 1 or 2
    /// - `samples.len()` is not a multiple of `channel_count`
    pub fn new(samples: Vec<f32>, sample_rate: u32, channel_count: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate must be positive".to_string()));
        }
        if !(1..=2).contains(&channel_count) {
            return Err(Error::InvalidBuffer(format!(
                "channel count must be 1 or 2, got {}",
                channel_count
            )));
        }
        if samples.len() % channel_count as usize != 0 {
            return Err(Error::InvalidBuffer(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channel_count
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
            channel_count,
        })
    }

    /// Create a silent buffer of `frames` frames
    pub fn silence(frames: usize, sample_rate: u32, channel_count: u16) -> Result<Self> {
        Self::new(
            vec![0.0; frames * channel_count as usize],
            sample_rate,
            channel_count,
        )
    }

    /// New buffer with the same rate and channel layout as `self`.
    ///
    /// Callers must pass a whole number of frames.
    pub(crate) fn with_samples(&self, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len() % self.channel_count as usize, 0);
        Self {
            samples,
            sample_rate: self.sample_rate,
            channel_count: self.channel_count,
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the buffer, returning its interleaved samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds (zero for an empty buffer)
    pub fn duration_ms(&self) -> f64 {
        self.frame_count() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Number of frames covering `ms` milliseconds at this buffer's rate
    pub fn frames_for_ms(&self, ms: u64) -> usize {
        (ms * self.sample_rate as u64 / 1000) as usize
    }

    /// Samples of one frame, or None past the end
    pub fn frame(&self, frame_index: usize) -> Option<&[f32]> {
        let channels = self.channel_count as usize;
        let start = frame_index * channels;
        self.samples.get(start..start + channels)
    }

    /// Copy of frames `start..end`, clamped to the buffer length
    pub fn slice_frames(&self, start: usize, end: usize) -> AudioBuffer {
        let channels = self.channel_count as usize;
        let end = end.min(self.frame_count());
        let start = start.min(end);
        self.with_samples(self.samples[start * channels..end * channels].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let samples = vec![0.5, -0.5, 0.25, -0.25]; // 2 stereo frames
        let buffer = AudioBuffer::new(samples.clone(), 44100, 2).unwrap();

        assert_eq!(buffer.samples(), samples.as_slice());
        assert_eq!(buffer.sample_rate(), 44100);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 2);
    }

    #[test]
    fn test_rejects_partial_frame() {
        let result = AudioBuffer::new(vec![0.1, 0.2, 0.3], 44100, 2);
        assert!(matches!(result, Err(Error::InvalidBuffer(_))));
    }

    #[test]
    fn test_rejects_bad_layout() {
        assert!(AudioBuffer::new(vec![0.0; 6], 44100, 3).is_err());
        assert!(AudioBuffer::new(vec![0.0; 6], 44100, 0).is_err());
        assert!(AudioBuffer::new(vec![0.0; 6], 0, 2).is_err());
    }

    #[test]
    fn test_duration() {
        // 44100 frames = 1 second at 44.1kHz
        let buffer = AudioBuffer::silence(44100, 44100, 2).unwrap();
        assert_eq!(buffer.duration_ms(), 1000.0);

        let half = AudioBuffer::silence(11025, 22050, 1).unwrap();
        assert_eq!(half.duration_ms(), 500.0);
    }

    #[test]
    fn test_empty_duration_is_zero() {
        let buffer = AudioBuffer::new(Vec::new(), 48000, 1).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.frame_count(), 0);
        assert_eq!(buffer.duration_ms(), 0.0);
    }

    #[test]
    fn test_get_frame() {
        let buffer = AudioBuffer::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 44100, 2).unwrap();

        assert_eq!(buffer.frame(0), Some(&[0.1, 0.2][..]));
        assert_eq!(buffer.frame(2), Some(&[0.5, 0.6][..]));
        // Out of bounds
        assert!(buffer.frame(3).is_none());
    }

    #[test]
    fn test_slice_frames_clamps() {
        let buffer = AudioBuffer::new(vec![1.0, 2.0, 3.0, 4.0], 8000, 1).unwrap();

        assert_eq!(buffer.slice_frames(1, 3).samples(), &[2.0, 3.0]);
        assert_eq!(buffer.slice_frames(2, 100).samples(), &[3.0, 4.0]);
        assert!(buffer.slice_frames(10, 20).is_empty());
    }

    #[test]
    fn test_frames_for_ms() {
        let buffer = AudioBuffer::silence(1, 44100, 2).unwrap();
        assert_eq!(buffer.frames_for_ms(3000), 132300);
        assert_eq!(buffer.frames_for_ms(0), 0);
    }
}
