//! HTTP client for the synthesis engine services.

use std::path::Path;

use serde::Deserialize;

use crate::cli::EngineKind;

use super::Engine;
use super::types::{EngineError, EngineRequest, HealthReport};

/// HTTP-based engine client.
pub struct HttpEngine {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpEngine {
    /// Create a new HTTP engine client.
    pub fn new(kind: EngineKind, host: &str) -> Self {
        let port = kind.port();
        let base_url = format!("http://{host}:{port}");

        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Get the base URL for this engine.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response into an engine error, preferring the
    /// engine's own error message when the body carries one.
    fn failure_from(response: reqwest::blocking::Response) -> EngineError {
        let status = response.status();

        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        match response.json::<ErrorBody>() {
            Ok(body) => EngineError::EngineFailure(body.error),
            Err(_) => EngineError::RequestFailed(format!("Status: {status}")),
        }
    }
}

impl Engine for HttpEngine {
    fn health(&self) -> Result<HealthReport, EngineError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }

    fn synthesize(&self, request: &EngineRequest) -> Result<Vec<u8>, EngineError> {
        let url = format!("{}/synthesize", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::failure_from(response));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }

    fn upload_reference(&self, audio_path: &Path) -> Result<String, EngineError> {
        let url = format!("{}/upload", self.base_url);

        let audio_data = std::fs::read(audio_path)
            .map_err(|_| EngineError::FileNotFound(audio_path.display().to_string()))?;

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference.wav");

        let file_part = reqwest::blocking::multipart::Part::bytes(audio_data)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        let form = reqwest::blocking::multipart::Form::new().part("files", file_part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::RequestFailed(format!(
                "Upload failed: {}",
                response.status()
            )));
        }

        let paths: Vec<String> = response
            .json()
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        paths
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::InvalidResponse("No path returned".to_string()))
    }

    fn release(&self) -> Result<(), EngineError> {
        let url = format!("{}/release", self.base_url);

        let response = self
            .client
            .post(&url)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
