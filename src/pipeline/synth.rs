//! Request-to-artifact pipeline.

use std::io::Cursor;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::artifact::{Artifact, ArtifactError, AudioFormat, Workspace};
use crate::backend::{Engine, EngineError, EngineRequest, HealthReport};
use crate::speech::{RequestError, SpeechRequest};

use super::session::DeviceSession;

/// Message shown to the user when the engine fails. The specific cause goes
/// to the log, not the page.
pub const GENERIC_FAILURE: &str =
    "Audio generation failed. The engine reported an error; see the server log for details.";

/// Errors that can occur while turning a request into an artifact.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Invalid request: {0}")]
    Invalid(#[from] RequestError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Boundary result of one synthesis attempt.
///
/// Every failure is recovered here: callers receive either the artifact, the
/// validation error verbatim, or a generic failure message.
#[derive(Debug)]
#[must_use]
pub enum SynthesisOutcome {
    Ready(Artifact),
    /// Rejected before the engine was called.
    Invalid(RequestError),
    /// Engine-level failure, already logged with its cause.
    Failed { message: String },
}

/// The synthesis invoker: validates a request, calls the engine, and stores
/// the resulting artifact in the workspace.
pub struct Synthesizer<E: Engine> {
    engine: E,
    workspace: Workspace,
    format: AudioFormat,
}

impl<E: Engine> Synthesizer<E> {
    /// Create a new synthesizer over an engine and a workspace.
    pub fn new(engine: E, workspace: Workspace, format: AudioFormat) -> Self {
        Self {
            engine,
            workspace,
            format,
        }
    }

    /// Workspace that artifacts are written into.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Check engine health and device status.
    pub fn health(&self) -> Result<HealthReport, EngineError> {
        self.engine.health()
    }

    /// Ask the engine to free cached model state and device memory.
    pub fn release(&self) -> Result<(), EngineError> {
        self.engine.release()
    }

    /// Turn a request into a stored artifact, or fail with a typed error.
    pub fn synthesize(&self, request: &SpeechRequest) -> Result<Artifact, SynthesisError> {
        request.validate()?;

        let speaker_wav = match &request.reference {
            Some(path) => Some(self.engine.upload_reference(path)?),
            None => None,
        };

        let mut engine_request = EngineRequest::new(&request.text, request.language.code())
            .with_slow(request.style.is_slow());
        if let Some(server_path) = speaker_wav {
            engine_request = engine_request.with_speaker_wav(server_path);
        }

        let audio = self.engine.synthesize(&engine_request)?;

        if self.format == AudioFormat::Wav {
            let (sample_rate, seconds) = inspect_wav(&audio)?;
            debug!(sample_rate, seconds, "engine returned WAV");
        }

        let artifact = self
            .workspace
            .store(request.language, request.style, self.format, &audio)?;

        info!(
            language = %request.language,
            style = %request.style,
            path = %artifact.path.display(),
            "synthesis complete"
        );

        Ok(artifact)
    }

    /// Run one attempt and recover every failure into an outcome.
    pub fn run(&self, request: &SpeechRequest) -> SynthesisOutcome {
        match self.synthesize(request) {
            Ok(artifact) => SynthesisOutcome::Ready(artifact),
            Err(SynthesisError::Invalid(err)) => {
                debug!(%err, "request rejected before engine call");
                SynthesisOutcome::Invalid(err)
            }
            Err(err) => {
                error!(error = ?err, "synthesis failed");
                SynthesisOutcome::Failed {
                    message: GENERIC_FAILURE.to_string(),
                }
            }
        }
    }

    /// Run one attempt with the engine's device memory released afterwards.
    ///
    /// The release happens when the session guard drops, so it covers
    /// success, failure, and unwinding alike.
    pub fn run_with_release(&self, request: &SpeechRequest) -> SynthesisOutcome {
        let _device = DeviceSession::new(&self.engine);
        self.run(request)
    }
}

/// Read the header of an engine-produced WAV, rejecting malformed payloads.
fn inspect_wav(audio: &[u8]) -> Result<(u32, f32), EngineError> {
    let reader = hound::WavReader::new(Cursor::new(audio))
        .map_err(|e| EngineError::InvalidResponse(format!("Malformed WAV from engine: {e}")))?;

    let spec = reader.spec();
    let seconds = reader.duration() as f32 / spec.sample_rate as f32;

    Ok((spec.sample_rate, seconds))
}
