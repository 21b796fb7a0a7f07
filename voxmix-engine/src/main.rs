//! voxmix - text-to-speech with background music
//!
//! Command-line front end for the mixing engine: mix existing voice and music
//! files, render a short preview, or synthesize speech and mix it in one go.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxmix_common::config::{self, TomlConfig};
use voxmix_common::presets::{self, Preset};
use voxmix_common::voices;
use voxmix_engine::audio::{Encoder, Mp3Encoder, TrackLoader, WavEncoder};
use voxmix_engine::pipeline::{self, MusicInput, RenderJob};
use voxmix_engine::synth::{EdgeTtsCommand, SynthesisRequest};
use voxmix_engine::MixParameters;

/// Command-line arguments for voxmix
#[derive(Parser, Debug)]
#[command(name = "voxmix")]
#[command(about = "Text-to-speech with background music mixing")]
#[command(version)]
struct Args {
    /// Config file (default: $VOXMIX_CONFIG, then <config_dir>/voxmix/config.toml)
    #[arg(long, global = true, env = "VOXMIX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mix an existing voice file with background music
    Mix {
        voice: PathBuf,
        music: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        mix: MixOptions,

        #[command(flatten)]
        encode: EncodeOptions,

        /// Render a preview next to the output first (failures are not fatal)
        #[arg(long)]
        check: bool,
    },

    /// Render a 5 second diagnostic clip (music at -20 dB)
    Preview {
        voice: PathBuf,
        music: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        encode: EncodeOptions,
    },

    /// Synthesize text and optionally mix it with background music
    Speak {
        /// Text to speak
        #[arg(long, conflicts_with = "text_file", required_unless_present = "text_file")]
        text: Option<String>,

        /// UTF-8 text file to speak
        #[arg(long)]
        text_file: Option<PathBuf>,

        /// Voice label (see `voxmix voices`); defaults to the saved preset
        #[arg(long)]
        voice: Option<String>,

        /// Speed in percent (50-150); defaults to the saved preset
        #[arg(long, value_parser = clap::value_parser!(u32).range(50..=150))]
        rate: Option<u32>,

        /// Pitch in percent (-20 to 20); defaults to the saved preset
        #[arg(long, value_parser = clap::value_parser!(i32).range(-20..=20), allow_hyphen_values = true)]
        pitch: Option<i32>,

        /// Background music file (.mp3 or .wav)
        #[arg(long)]
        music: Option<PathBuf>,

        #[command(flatten)]
        mix: MixOptions,

        #[command(flatten)]
        encode: EncodeOptions,

        /// Output base name, used when --output is not given
        #[arg(long, default_value = "MyNarration")]
        name: String,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the preview check before mixing
        #[arg(long)]
        check: bool,

        /// Store voice/rate/pitch as the new preset
        #[arg(long)]
        save_preset: bool,
    },

    /// List available voices
    Voices,

    /// Show or save the voice preset
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Decode a file and print its format
    Info { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    Show,
    Save {
        #[arg(long)]
        voice: String,
        #[arg(long, default_value_t = 100)]
        rate: u32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        pitch: i32,
    },
}

#[derive(clap::Args, Debug)]
struct MixOptions {
    /// Music volume in percent (0 disables music)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Fade music in over 3 seconds
    #[arg(long, value_name = "BOOL")]
    fade_in: Option<bool>,

    /// Fade music out over 3 seconds
    #[arg(long, value_name = "BOOL")]
    fade_out: Option<bool>,
}

impl MixOptions {
    fn resolve(&self, config: &TomlConfig) -> MixParameters {
        MixParameters::new(
            self.volume.unwrap_or(config.default_volume_percent),
            self.fade_in.unwrap_or(config.default_fade_in),
            self.fade_out.unwrap_or(config.default_fade_out),
        )
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Mp3,
    Wav,
}

#[derive(clap::Args, Debug)]
struct EncodeOptions {
    #[arg(long, value_enum, default_value_t = OutputFormat::Mp3)]
    format: OutputFormat,
}

impl EncodeOptions {
    fn encoder(&self, config: &TomlConfig) -> Box<dyn Encoder> {
        match self.format {
            OutputFormat::Mp3 => Box::new(
                Mp3Encoder::new(&config.ffmpeg_path)
                    .with_bitrate_kbps(config.mp3_bitrate_kbps)
                    .with_quality(config.mp3_quality)
                    .with_timeout(Duration::from_secs(config.timeout_secs)),
            ),
            OutputFormat::Wav => Box::new(WavEncoder),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("voxmix: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args.command, config).await {
        let kind = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<voxmix_engine::Error>())
            .map(|engine_error| engine_error.kind())
            .unwrap_or("error");
        error!(kind, "{:#}", e);
        eprintln!("voxmix [{}]: {:#}", kind, e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: TomlConfig) -> Result<()> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match command {
        Command::Mix {
            voice,
            music,
            output,
            mix,
            encode,
            check,
        } => {
            let params = mix.resolve(&config);
            if check {
                let encoder = encode.encoder(&config);
                let preview_path = output.with_extension(format!("preview.{}", encoder.extension()));
                let (v, m) = (voice.clone(), music.clone());
                let result = run_blocking(timeout, "preview", move || {
                    pipeline::preview_files(&v, &m, encoder.as_ref())
                })
                .await;
                match result {
                    Ok(bytes) => {
                        write_output(&preview_path, &bytes)?;
                        info!("Preview written to {}", preview_path.display());
                    }
                    Err(e) => error!("Audio test failed: {:#}", e),
                }
            }

            let encoder = encode.encoder(&config);
            let bytes = run_blocking(timeout, "mix", move || {
                pipeline::mix_files(&voice, &music, &params, encoder.as_ref())
            })
            .await?;
            write_output(&output, &bytes)?;
            info!("Mixed audio written to {}", output.display());
        }

        Command::Preview {
            voice,
            music,
            output,
            encode,
        } => {
            let encoder = encode.encoder(&config);
            let bytes = run_blocking(timeout, "preview", move || {
                pipeline::preview_files(&voice, &music, encoder.as_ref())
            })
            .await?;
            write_output(&output, &bytes)?;
            info!("Preview written to {}", output.display());
        }

        Command::Speak {
            text,
            text_file,
            voice,
            rate,
            pitch,
            music,
            mix,
            encode,
            name,
            output,
            check,
            save_preset,
        } => {
            let text = match (text, text_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read text file {}", path.display()))?,
                (None, None) => bail!("Provide --text or --text-file"),
            };

            let saved = presets::load(&config.presets_file);
            let preset = Preset {
                voice: voice.unwrap_or(saved.voice),
                rate: rate.unwrap_or(saved.rate),
                pitch: pitch.unwrap_or(saved.pitch),
            };
            let voice = voices::lookup(&preset.voice)
                .or_else(|| voices::lookup_id(&preset.voice))
                .ok_or_else(|| anyhow!("Unknown voice '{}' (see `voxmix voices`)", preset.voice))?;

            if save_preset {
                let to_save = Preset {
                    voice: voice.label.to_string(),
                    ..preset.clone()
                };
                presets::save(&config.presets_file, &to_save).context("Failed to save preset")?;
                info!("Preset saved to {}", config.presets_file.display());
            }

            let music = match music {
                Some(path) => Some(MusicInput {
                    bytes: std::fs::read(&path)
                        .with_context(|| format!("Failed to read music file {}", path.display()))?,
                    extension: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or_default()
                        .to_string(),
                }),
                None => None,
            };

            let job = RenderJob {
                request: SynthesisRequest {
                    text,
                    voice_id: voice.id.to_string(),
                    rate_percent: preset.rate,
                    pitch_percent: preset.pitch,
                },
                music,
                params: mix.resolve(&config),
                check_first: check,
            };

            let encoder = encode.encoder(&config);
            let output = output
                .unwrap_or_else(|| PathBuf::from(pipeline::output_file_name(&name, encoder.as_ref())));
            let synthesizer = EdgeTtsCommand::new(&config.tts_command).with_timeout(timeout);

            let rendered = run_blocking(timeout, "render", move || {
                pipeline::render(&job, &synthesizer, encoder.as_ref())
            })
            .await?;

            if let Some(preview) = &rendered.preview {
                let preview_path = output.with_extension(format!(
                    "preview.{}",
                    output.extension().and_then(|e| e.to_str()).unwrap_or("mp3")
                ));
                write_output(&preview_path, preview)?;
                info!("Preview written to {}", preview_path.display());
            }
            write_output(&output, &rendered.bytes)?;
            info!(
                "{} ({:.1}s{}) written to {}",
                if rendered.mixed { "Mixed narration" } else { "Narration" },
                rendered.duration_ms / 1000.0,
                if rendered.mixed { ", with music" } else { "" },
                output.display()
            );
        }

        Command::Voices => {
            for voice in voices::all() {
                println!("{:<24} {}", voice.label, voice.id);
            }
        }

        Command::Preset { action } => match action {
            PresetAction::Show => {
                let preset = presets::load(&config.presets_file);
                println!("{}", serde_json::to_string_pretty(&preset)?);
            }
            PresetAction::Save { voice, rate, pitch } => {
                let preset = Preset { voice, rate, pitch };
                presets::save(&config.presets_file, &preset).context("Failed to save preset")?;
                println!("Preset saved to {}", config.presets_file.display());
            }
        },

        Command::Info { file } => {
            let buffer = run_blocking(timeout, "decode", move || TrackLoader::load_path(&file)).await?;
            println!("sample_rate: {} Hz", buffer.sample_rate());
            println!("channels:    {}", buffer.channel_count());
            println!("frames:      {}", buffer.frame_count());
            println!("duration:    {:.0} ms", buffer.duration_ms());
        }
    }

    Ok(())
}

/// Run blocking engine work off the async runtime, bounded by `timeout`.
///
/// After a timeout the task is still awaited, so the staged files it owns are
/// dropped before the process exits. External tools it runs carry the same
/// deadline and are killed by then.
async fn run_blocking<T, F>(timeout: Duration, what: &str, work: F) -> Result<T>
where
    F: FnOnce() -> voxmix_engine::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(result)) => result.with_context(|| format!("{} failed", what)),
        Ok(Err(join_error)) => Err(anyhow!("{} task failed: {}", what, join_error)),
        Err(_) => {
            warn!("{} exceeded {}s, waiting for it to release its files", what, timeout.as_secs());
            if let Err(join_error) = task.await {
                warn!("{} task failed after timeout: {}", what, join_error);
            }
            Err(voxmix_engine::Error::Timeout(format!(
                "{} exceeded {}s",
                what,
                timeout.as_secs()
            )))
            .context(format!("{} aborted", what))
        }
    }
}

/// Write output in one go; nothing is written unless the bytes exist
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
