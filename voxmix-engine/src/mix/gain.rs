//! Volume-to-gain mapping and gain application

use crate::audio::AudioBuffer;

/// Gain at 0% volume (dB)
pub const MIN_GAIN_DB: f64 = -30.0;

/// Gain added per volume percent (dB)
pub const GAIN_DB_PER_PERCENT: f64 = 0.35;

/// Map a volume percentage to decibels: `-30 + volume * 0.35`.
///
/// 0% -> -30 dB, 50% -> -12.5 dB, 100% -> +5 dB.
pub fn volume_to_db(volume_percent: u8) -> f64 {
    MIN_GAIN_DB + volume_percent as f64 * GAIN_DB_PER_PERCENT
}

/// Convert decibels to a linear amplitude multiplier
pub fn db_to_linear(gain_db: f64) -> f32 {
    10f64.powf(gain_db / 20.0) as f32
}

/// Scale every sample by `gain_db`.
///
/// No clipping happens here; samples may leave [-1.0, 1.0] until overlay.
pub fn apply_gain(buffer: &AudioBuffer, gain_db: f64) -> AudioBuffer {
    let multiplier = db_to_linear(gain_db);
    buffer.with_samples(buffer.samples().iter().map(|s| s * multiplier).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_volume_mapping() {
        assert_close(volume_to_db(0), -30.0);
        assert_close(volume_to_db(30), -19.5);
        assert_close(volume_to_db(50), -12.5);
        assert_close(volume_to_db(100), 5.0);
    }

    #[test]
    fn test_mapping_is_monotonic() {
        for v in 0..100u8 {
            assert!(volume_to_db(v + 1) > volume_to_db(v));
        }
    }

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_apply_gain_leaves_input_untouched() {
        let input = AudioBuffer::new(vec![0.5, -0.5, 1.0, 0.0], 44100, 2).unwrap();
        let output = apply_gain(&input, -20.0);

        assert_eq!(input.samples(), &[0.5, -0.5, 1.0, 0.0]);
        let expected = [0.05, -0.05, 0.1, 0.0];
        for (out, exp) in output.samples().iter().zip(expected) {
            assert!((out - exp).abs() < 1e-6);
        }
    }

    #[test]
    fn test_positive_gain_not_clipped() {
        let input = AudioBuffer::new(vec![0.9], 8000, 1).unwrap();
        let output = apply_gain(&input, 5.0);
        assert!(output.samples()[0] > 1.0);
    }
}
