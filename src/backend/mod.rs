//! Communication with the external synthesis engine services.
//!
//! Provides the trait and HTTP implementation for talking to the engine
//! processes (standard MP3 encoder service and XTTS cloning service).

mod client;
mod types;

pub use client::HttpEngine;
pub use types::{EngineError, EngineRequest, HealthReport};

use crate::cli::EngineKind;

/// Trait for synthesis engine communication.
///
/// This trait abstracts the HTTP communication with the engine services,
/// allowing for mock implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Engine: Send + Sync {
    /// Check engine health and device status.
    fn health(&self) -> Result<HealthReport, EngineError>;

    /// Synthesize speech from text.
    ///
    /// # Returns
    /// Encoded audio bytes (MP3 or WAV depending on the engine).
    fn synthesize(&self, request: &EngineRequest) -> Result<Vec<u8>, EngineError>;

    /// Upload a reference clip for voice cloning.
    ///
    /// # Returns
    /// The engine-side path of the uploaded clip.
    fn upload_reference(&self, audio_path: &std::path::Path) -> Result<String, EngineError>;

    /// Ask the engine to drop cached model state and free device memory.
    fn release(&self) -> Result<(), EngineError>;
}

/// Create an engine client for the given profile.
pub fn create_engine(kind: EngineKind, host: &str) -> HttpEngine {
    HttpEngine::new(kind, host)
}
