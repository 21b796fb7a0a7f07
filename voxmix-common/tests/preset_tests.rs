//! Preset persistence tests

use tempfile::TempDir;
use voxmix_common::presets::{self, Preset};
use voxmix_common::Error;

#[test]
fn test_load_missing_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let preset = presets::load(&temp.path().join("tts_presets.json"));
    assert_eq!(preset, Preset::default());
}

#[test]
fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("tts_presets.json");

    let preset = Preset {
        voice: "Guy (US, Male)".to_string(),
        rate: 125,
        pitch: -5,
    };
    presets::save(&path, &preset).unwrap();

    assert!(path.exists());
    assert_eq!(presets::load(&path), preset);
}

#[test]
fn test_corrupt_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tts_presets.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(presets::load(&path), Preset::default());
}

#[test]
fn test_reads_flat_record_written_elsewhere() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tts_presets.json");
    std::fs::write(
        &path,
        r#"{"voice": "Aria (US, Female)", "rate": 90, "pitch": 3}"#,
    )
    .unwrap();

    let preset = presets::load(&path);
    assert_eq!(preset.voice, "Aria (US, Female)");
    assert_eq!(preset.rate, 90);
    assert_eq!(preset.pitch, 3);
}

#[test]
fn test_save_rejects_invalid_preset() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tts_presets.json");
    let preset = Preset {
        voice: "Jenny (US, Female)".to_string(),
        rate: 10,
        pitch: 0,
    };

    let result = presets::save(&path, &preset);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(!path.exists());
}

#[test]
fn test_out_of_range_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tts_presets.json");

    for record in [
        r#"{"voice": "Guy (US, Male)", "rate": 500, "pitch": 0}"#,
        r#"{"voice": "Guy (US, Male)", "rate": 100, "pitch": -90}"#,
        r#"{"voice": "Nobody (Mars)", "rate": 100, "pitch": 0}"#,
    ] {
        std::fs::write(&path, record).unwrap();
        assert_eq!(presets::load(&path), Preset::default(), "accepted {}", record);
    }
}
