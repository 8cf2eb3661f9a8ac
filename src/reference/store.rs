//! Reference clip storage for voice cloning.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during reference clip management.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference clip not found: {0}")]
    NotFound(String),

    #[error("Invalid clip name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Metadata for a saved reference clip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceMetadata {
    pub name: String,
    pub created_at: String,
    /// Clip length in seconds, when the WAV header could be read.
    pub duration: Option<f32>,
}

/// Manages reference clips stored on disk.
pub struct ReferenceStore {
    clips_dir: PathBuf,
}

impl ReferenceStore {
    /// Create a new ReferenceStore with the default directory.
    pub fn new() -> Self {
        let clips_dir = dirs::home_dir()
            .expect("Could not find home directory")
            .join(".vocalia")
            .join("references");

        Self { clips_dir }
    }

    /// Create a new ReferenceStore with a custom directory.
    pub fn with_dir(clips_dir: PathBuf) -> Self {
        Self { clips_dir }
    }

    /// Get the clips directory path.
    pub fn clips_dir(&self) -> PathBuf {
        self.clips_dir.clone()
    }

    /// Validate a clip name.
    fn validate_name(name: &str) -> Result<(), ReferenceError> {
        if name.is_empty() {
            return Err(ReferenceError::InvalidName(
                "Name cannot be empty".to_string(),
            ));
        }

        // Prevent path traversal
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(ReferenceError::InvalidName(
                "Name cannot contain path separators".to_string(),
            ));
        }

        Ok(())
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.clips_dir.join(format!("{}.json", name))
    }

    fn wav_path(&self, name: &str) -> PathBuf {
        self.clips_dir.join(format!("{}.wav", name))
    }

    /// Save a reference clip and its metadata, replacing any previous clip
    /// with the same name.
    pub fn save(&self, name: &str, audio: &[u8]) -> Result<ReferenceMetadata, ReferenceError> {
        Self::validate_name(name)?;

        std::fs::create_dir_all(&self.clips_dir)?;

        let wav_path = self.wav_path(name);
        std::fs::write(&wav_path, audio)?;

        let duration = match hound::WavReader::open(&wav_path) {
            Ok(reader) => {
                let spec = reader.spec();
                Some(reader.duration() as f32 / spec.sample_rate as f32)
            }
            Err(err) => {
                warn!(name, "Could not read clip duration: {err}");
                None
            }
        };

        let metadata = ReferenceMetadata {
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
            duration,
        };

        let json = serde_json::to_string_pretty(&metadata)?;
        std::fs::write(self.metadata_path(name), json)?;

        Ok(metadata)
    }

    /// Load metadata for a stored clip.
    pub fn load(&self, name: &str) -> Result<ReferenceMetadata, ReferenceError> {
        Self::validate_name(name)?;

        let path = self.metadata_path(name);

        if !path.exists() {
            return Err(ReferenceError::NotFound(name.to_string()));
        }

        let json = std::fs::read_to_string(path)?;
        let metadata = serde_json::from_str(&json)?;

        Ok(metadata)
    }

    /// Path of a stored clip's audio file.
    pub fn clip_path(&self, name: &str) -> Result<PathBuf, ReferenceError> {
        Self::validate_name(name)?;

        let path = self.wav_path(name);

        if !path.exists() {
            return Err(ReferenceError::NotFound(name.to_string()));
        }

        Ok(path)
    }

    /// Delete a stored clip and its metadata.
    pub fn delete(&self, name: &str) -> Result<(), ReferenceError> {
        Self::validate_name(name)?;

        let wav_path = self.wav_path(name);

        if !wav_path.exists() {
            return Err(ReferenceError::NotFound(name.to_string()));
        }

        std::fs::remove_file(wav_path)?;

        let metadata_path = self.metadata_path(name);
        if metadata_path.exists() {
            std::fs::remove_file(metadata_path)?;
        }

        Ok(())
    }

    /// List all stored clips.
    pub fn list(&self) -> Result<Vec<ReferenceMetadata>, ReferenceError> {
        if !self.clips_dir.exists() {
            return Ok(Vec::new());
        }

        let mut clips = Vec::new();

        for entry in std::fs::read_dir(&self.clips_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let json = std::fs::read_to_string(&path)?;
                if let Ok(metadata) = serde_json::from_str::<ReferenceMetadata>(&json) {
                    clips.push(metadata);
                }
            }
        }

        Ok(clips)
    }
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}
