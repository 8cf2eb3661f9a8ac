//! CLI argument definitions and parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::artifact::AudioFormat;
use crate::speech::{Language, VoiceStyle};

/// Web form front-end over an external text-to-speech engine.
#[derive(Parser, Debug)]
#[command(name = "vocalia")]
#[command(about = "Text-to-speech web form over an external synthesis engine")]
#[command(version)]
pub struct Args {
    /// Engine profile: "standard" (MP3 encoder service) or "xtts" (voice cloning service)
    #[arg(short, long, value_enum, default_value = "standard")]
    pub engine: EngineKind,

    /// Engine host address
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Address the web form listens on
    #[arg(short, long, default_value = "127.0.0.1:7860")]
    pub listen: SocketAddr,

    /// Generate speech once from the command line instead of serving the form
    #[arg(short, long)]
    pub generate: Option<String>,

    /// Language code for --generate (e.g. "fr", "en")
    #[arg(long, default_value = "fr", value_parser = parse_language)]
    pub language: Language,

    /// Voice style for --generate
    #[arg(long, default_value = "standard", value_parser = parse_style)]
    pub style: VoiceStyle,

    /// Output audio file for --generate
    #[arg(short, long, default_value = "output.mp3")]
    pub output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Voice-cloning studio front-end.
#[derive(Parser, Debug)]
#[command(name = "vocalia-studio")]
#[command(about = "Text-to-speech form with voice cloning from a reference clip")]
#[command(version)]
pub struct StudioArgs {
    /// Engine host address
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Address the studio form listens on
    #[arg(short, long, default_value = "127.0.0.1:7861")]
    pub listen: SocketAddr,

    /// Directory for stored reference clips
    #[arg(long)]
    pub reference_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Engine profile selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineKind {
    /// Standard synthesis service (MP3 output)
    #[default]
    #[value(name = "standard")]
    Standard,

    /// XTTS v2 cloning service (WAV output, GPU-backed)
    #[value(name = "xtts")]
    Xtts,
}

impl EngineKind {
    /// Returns the CLI argument string for this profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Standard => "standard",
            EngineKind::Xtts => "xtts",
        }
    }

    /// Returns the engine service port for this profile.
    pub fn port(&self) -> u16 {
        match self {
            EngineKind::Standard => 5002,
            EngineKind::Xtts => 5004,
        }
    }

    /// Returns the human-readable name of the profile.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Standard => "Standard TTS",
            EngineKind::Xtts => "XTTS v2",
        }
    }

    /// Container format this engine produces.
    pub fn format(&self) -> AudioFormat {
        match self {
            EngineKind::Standard => AudioFormat::Mp3,
            EngineKind::Xtts => AudioFormat::Wav,
        }
    }
}

/// clap value parser for language codes.
pub fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| {
        let supported: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        format!(
            "Unknown language code '{code}'. Supported: {}",
            supported.join(", ")
        )
    })
}

/// clap value parser for voice styles.
pub fn parse_style(code: &str) -> Result<VoiceStyle, String> {
    VoiceStyle::from_code(code)
        .ok_or_else(|| format!("Unknown voice style '{code}'. Supported: standard, slow, preset, cloned"))
}
