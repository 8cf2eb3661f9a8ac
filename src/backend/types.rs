//! Engine request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when communicating with the synthesis engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Engine error: {0}")]
    EngineFailure(String),
}

/// Health check response from the engine service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub engine: String,
    pub cuda_available: bool,
    pub gpu: Option<String>,
    pub device: String,
}

/// Request for one synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRequest {
    pub text: String,
    pub language: String,
    #[serde(default)]
    pub slow: bool,
    /// Engine-side path of an uploaded reference clip to clone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_wav: Option<String>,
}

impl EngineRequest {
    /// Create a request with default style parameters.
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            slow: false,
            speaker_wav: None,
        }
    }

    /// Ask for a slower speaking rate.
    pub fn with_slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }

    /// Clone the voice from an uploaded reference clip.
    pub fn with_speaker_wav(mut self, server_path: impl Into<String>) -> Self {
        self.speaker_wav = Some(server_path.into());
        self
    }
}
