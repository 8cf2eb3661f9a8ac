//! Artifact workspace for temporary audio files.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

use crate::speech::{Language, VoiceStyle};

/// Errors that can occur while storing artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Engine returned no audio data")]
    EmptyAudio,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Container format of a stored artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// File extension without the dot.
    pub fn ext(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// MIME type for delivery.
    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

/// One synthesized audio file, owned by the request that produced it.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub language: Language,
    pub style: VoiceStyle,
    pub format: AudioFormat,
    pub created_at: String,
}

impl Artifact {
    /// MIME type for delivery.
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// File name offered for the download action.
    pub fn download_name(&self) -> String {
        format!(
            "vocalia_{}_{}.{}",
            self.language.code(),
            self.style.as_str(),
            self.format.ext()
        )
    }
}

enum Root {
    Temp(TempDir),
    Pinned(PathBuf),
}

/// Process-scoped directory that artifacts are written into.
///
/// Created once at startup and passed explicitly to the synthesizer. The
/// temporary directory is removed when the workspace drops.
pub struct Workspace {
    root: Root,
}

impl Workspace {
    /// Create a workspace backed by a fresh temporary directory.
    pub fn new() -> Result<Self, ArtifactError> {
        let dir = tempfile::Builder::new().prefix("vocalia-").tempdir()?;
        Ok(Self {
            root: Root::Temp(dir),
        })
    }

    /// Create a workspace over an existing directory.
    ///
    /// The directory is left in place when the workspace drops.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            root: Root::Pinned(dir),
        }
    }

    /// Directory that artifacts are written into.
    pub fn dir(&self) -> &Path {
        match &self.root {
            Root::Temp(dir) => dir.path(),
            Root::Pinned(path) => path,
        }
    }

    /// Write audio bytes under a style-distinct name and return the artifact.
    pub fn store(
        &self,
        language: Language,
        style: VoiceStyle,
        format: AudioFormat,
        audio: &[u8],
    ) -> Result<Artifact, ArtifactError> {
        if audio.is_empty() {
            return Err(ArtifactError::EmptyAudio);
        }

        let path = self
            .dir()
            .join(format!("output_{}.{}", style.as_str(), format.ext()));
        std::fs::write(&path, audio)?;

        debug!(path = %path.display(), bytes = audio.len(), "artifact stored");

        Ok(Artifact {
            path,
            language,
            style,
            format,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// Best-effort removal of a delivered artifact.
    pub fn discard(&self, artifact: &Artifact) {
        if !artifact.path.exists() {
            return;
        }

        if let Err(err) = std::fs::remove_file(&artifact.path) {
            warn!(path = %artifact.path.display(), "Failed to remove artifact: {err}");
        } else {
            debug!(path = %artifact.path.display(), "artifact removed");
        }
    }
}
