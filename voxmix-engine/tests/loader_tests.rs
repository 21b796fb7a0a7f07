//! Track Loader Tests
//!
//! Verifies the loader decodes WAV fixtures with their native sample rate and
//! channel layout, resolves formats from extensions, and rejects empty or
//! corrupted input instead of returning zero-frame buffers.

mod helpers;

use helpers::{generate_sine_wav, WavFixture};
use tempfile::TempDir;
use voxmix_engine::audio::{Encoder, TrackLoader, WavEncoder};
use voxmix_engine::{AudioBuffer, Error, Format};

fn write_fixture(dir: &TempDir, name: &str, fixture: WavFixture) -> std::path::PathBuf {
    let path = dir.path().join(name);
    generate_sine_wav(&path, fixture).expect("Failed to write fixture");
    path
}

#[test]
fn test_load_mono_wav_keeps_layout() {
    let dir = TempDir::new().unwrap();
    let fixture = WavFixture::new(1000, 22050, 1);
    let path = write_fixture(&dir, "voice.wav", fixture);

    let buffer = TrackLoader::load_path(&path).unwrap();

    assert_eq!(buffer.sample_rate(), 22050);
    assert_eq!(buffer.channel_count(), 1);
    assert_eq!(buffer.frame_count(), fixture.frames());
    assert!((buffer.duration_ms() - 1000.0).abs() < 1.0);
}

#[test]
fn test_load_stereo_wav_samples_in_range() {
    let dir = TempDir::new().unwrap();
    let fixture = WavFixture::new(500, 48000, 2);
    let path = write_fixture(&dir, "music.WAVE", fixture);

    let buffer = TrackLoader::load_path(&path).unwrap();

    assert_eq!(buffer.sample_rate(), 48000);
    assert_eq!(buffer.channel_count(), 2);
    assert_eq!(buffer.samples().len(), fixture.frames() * 2);
    assert!(buffer.samples().iter().all(|s| (-1.0..=1.0).contains(s)));

    // Not silence: a 0.5 amplitude sine peaks near 0.5
    let peak = buffer.samples().iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!((peak - 0.5).abs() < 0.01, "unexpected peak {}", peak);
}

#[test]
fn test_unknown_extension_falls_back_to_probe() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "upload.bin", WavFixture::new(200, 44100, 2));

    assert_eq!(Format::from_path(&path), Format::Probe);
    let buffer = TrackLoader::load_path(&path).unwrap();
    assert_eq!(buffer.frame_count(), 8820);
}

#[test]
fn test_declared_format_must_match_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("really_wav.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    // Constant positive PCM so no byte pair resembles an MPEG frame sync
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..8820 {
        writer.write_sample(0x1234i16).unwrap();
    }
    writer.finalize().unwrap();

    let result = TrackLoader::load_file(&path, Format::Mp3);
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn test_load_bytes_matches_load_file() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "clip.wav", WavFixture::new(300, 16000, 1));

    let from_file = TrackLoader::load_path(&path).unwrap();
    let from_bytes = TrackLoader::load_bytes(std::fs::read(&path).unwrap(), Format::Wav).unwrap();
    assert_eq!(from_file, from_bytes);
}

#[test]
fn test_zero_byte_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.mp3");
    std::fs::write(&path, b"").unwrap();

    let result = TrackLoader::load_path(&path);
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn test_header_only_wav_never_yields_empty_buffer() {
    let empty = AudioBuffer::new(Vec::new(), 44100, 2).unwrap();
    let bytes = WavEncoder.encode(&empty).unwrap();

    let result = TrackLoader::load_bytes(bytes, Format::Wav);
    assert!(
        matches!(result, Err(Error::EmptyAudio(_)) | Err(Error::Decode(_))),
        "zero-frame input must be rejected"
    );
}

#[test]
fn test_corrupted_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.wav");
    std::fs::write(&path, b"RIFF\x10\x00\x00\x00WAVEjunkjunkjunk").unwrap();

    let result = TrackLoader::load_path(&path);
    assert!(matches!(result, Err(Error::Decode(_)) | Err(Error::EmptyAudio(_))));
}

#[test]
fn test_wav_encoder_round_trip_preserves_format() {
    let original = helpers::sine_buffer(WavFixture::new(250, 32000, 2));
    let bytes = WavEncoder.encode(&original).unwrap();

    let decoded = TrackLoader::load_bytes(bytes, Format::Wav).unwrap();
    assert_eq!(decoded.sample_rate(), 32000);
    assert_eq!(decoded.channel_count(), 2);
    assert_eq!(decoded.frame_count(), original.frame_count());
}
