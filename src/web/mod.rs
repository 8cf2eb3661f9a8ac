//! Web front-ends: the plain form variant and the cloning studio variant.

pub mod form;
pub mod pages;
pub mod studio;

pub use studio::StudioState;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

use crate::artifact::Artifact;
use crate::backend::Engine;
use crate::pipeline::{GENERIC_FAILURE, SynthesisOutcome, Synthesizer};
use crate::speech::VoiceStyle;

/// State shared by the handlers of one front-end.
///
/// Holds the synthesizer and the artifact produced for each voice style, so
/// playback and download requests can find the file a submission created.
pub struct AppState<E: Engine> {
    pub synthesizer: Synthesizer<E>,
    artifacts: Mutex<HashMap<VoiceStyle, Artifact>>,
}

impl<E: Engine> AppState<E> {
    pub fn new(synthesizer: Synthesizer<E>) -> Self {
        Self {
            synthesizer,
            artifacts: Mutex::new(HashMap::new()),
        }
    }

    /// Record the artifact of the latest submission for its style.
    pub fn store_artifact(&self, artifact: Artifact) {
        self.lock().insert(artifact.style, artifact);
    }

    /// Artifact currently held for a style.
    pub fn artifact(&self, style: VoiceStyle) -> Option<Artifact> {
        self.lock().get(&style).cloned()
    }

    /// Remove and return the artifact held for a style.
    pub fn take_artifact(&self, style: VoiceStyle) -> Option<Artifact> {
        self.lock().remove(&style)
    }

    /// Remove and return every held artifact, for the shutdown sweep.
    pub fn drain_artifacts(&self) -> Vec<Artifact> {
        self.lock().drain().map(|(_, artifact)| artifact).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<VoiceStyle, Artifact>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bridge the synchronous pipeline into the async handlers.
pub(crate) async fn run_blocking<F>(task: F) -> SynthesisOutcome
where
    F: FnOnce() -> SynthesisOutcome + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("synthesis task failed: {err}");
            SynthesisOutcome::Failed {
                message: GENERIC_FAILURE.to_string(),
            }
        }
    }
}

/// Resolve when the serving loop should stop.
pub(crate) async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{AudioFormat, Workspace};
    use crate::backend::MockEngine;
    use crate::pipeline::Synthesizer;
    use crate::reference::ReferenceStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn form_state(engine: MockEngine, dir: &TempDir) -> Arc<AppState<MockEngine>> {
        let workspace = Workspace::with_dir(dir.path().to_path_buf());
        Arc::new(AppState::new(Synthesizer::new(
            engine,
            workspace,
            AudioFormat::Mp3,
        )))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/synthesize")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let temp_dir = TempDir::new().unwrap();
        let state = form_state(MockEngine::new(), &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<form"));
        assert!(body.contains("<option value=\"fr\">French</option>"));
        assert!(body.contains("<option value=\"slow\">Slow</option>"));
        // The form variant offers neither cloning styles nor uploads.
        assert!(!body.contains("cloned"));
        assert!(!body.contains("type=\"file\""));
    }

    #[tokio::test]
    async fn test_empty_text_shows_validation_error() {
        let temp_dir = TempDir::new().unwrap();
        // No engine expectations: the engine must not be called.
        let state = form_state(MockEngine::new(), &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(post_form("text=&language=fr&style=standard"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Text cannot be empty"));
    }

    #[tokio::test]
    async fn test_unknown_option_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let state = form_state(MockEngine::new(), &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(post_form("text=Bonjour&language=tlh&style=standard"))
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains("Unknown language or voice style option"));
    }

    #[tokio::test]
    async fn test_synthesize_and_download() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockEngine::new();
        engine
            .expect_synthesize()
            .times(1)
            .returning(|_| Ok(b"ID3 fake mp3 data".to_vec()));
        let state = form_state(engine, &temp_dir);

        let response = form::router(state.clone())
            .oneshot(post_form("text=Bonjour&language=fr&style=standard"))
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("Audio generated."));
        assert!(body.contains("/audio/standard"));
        assert!(body.contains("/download/standard"));

        let response = form::router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/download/standard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "audio/mpeg"
        );
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("vocalia_fr_standard.mp3")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), b"ID3 fake mp3 data");
    }

    #[tokio::test]
    async fn test_engine_failure_shows_generic_message() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = MockEngine::new();
        engine.expect_synthesize().times(1).returning(|_| {
            Err(crate::backend::EngineError::ConnectionFailed(
                "refused".to_string(),
            ))
        });
        let state = form_state(engine, &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(post_form("text=Bonjour&language=fr&style=standard"))
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains(GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn test_audio_without_artifact_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let state = form_state(MockEngine::new(), &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/audio/standard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_audio_unknown_style_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let state = form_state(MockEngine::new(), &temp_dir);
        let app = form::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/audio/whisper")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn studio_state(
        engine: MockEngine,
        workspace_dir: &TempDir,
        clips_dir: &TempDir,
    ) -> Arc<StudioState<MockEngine>> {
        let workspace = Workspace::with_dir(workspace_dir.path().to_path_buf());
        let app = AppState::new(Synthesizer::new(engine, workspace, AudioFormat::Wav));
        let references = ReferenceStore::with_dir(clips_dir.path().to_path_buf());
        Arc::new(StudioState::new(app, references))
    }

    #[tokio::test]
    async fn test_studio_index_lists_stored_clips() {
        let workspace_dir = TempDir::new().unwrap();
        let clips_dir = TempDir::new().unwrap();
        let state = studio_state(MockEngine::new(), &workspace_dir, &clips_dir);
        state.references.save("narrator", b"fake wav").unwrap();

        let response = studio::router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains("narrator"));
        assert!(body.contains("<option value=\"ja\">Japanese</option>"));
        assert!(body.contains("<option value=\"cloned\">Cloned voice</option>"));
        assert!(body.contains("type=\"file\""));
    }

    #[tokio::test]
    async fn test_studio_delete_reference_redirects() {
        let workspace_dir = TempDir::new().unwrap();
        let clips_dir = TempDir::new().unwrap();
        let state = studio_state(MockEngine::new(), &workspace_dir, &clips_dir);
        state.references.save("narrator", b"fake wav").unwrap();

        let response = studio::router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/references/narrator/delete")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.references.load("narrator").is_err());
    }

    #[tokio::test]
    async fn test_studio_download_deletes_artifact() {
        let workspace_dir = TempDir::new().unwrap();
        let clips_dir = TempDir::new().unwrap();
        let state = studio_state(MockEngine::new(), &workspace_dir, &clips_dir);

        // Place an artifact directly, as a completed submission would.
        let artifact = state
            .app
            .synthesizer
            .workspace()
            .store(
                crate::speech::Language::French,
                VoiceStyle::Preset,
                AudioFormat::Wav,
                b"RIFF fake wav",
            )
            .unwrap();
        let path = artifact.path.clone();
        state.app.store_artifact(artifact);

        let response = studio::router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/download/preset")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("vocalia_fr_preset.wav")
        );
        // Delivered artifacts are removed from disk and from the table.
        assert!(!path.exists());
        assert!(state.app.artifact(VoiceStyle::Preset).is_none());
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            pages::escape("<b>\"quoted\" & 'solo'</b>"),
            "&lt;b&gt;&quot;quoted&quot; &amp; &#39;solo&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_drain_artifacts_empties_table() {
        let temp_dir = TempDir::new().unwrap();
        let state = form_state(MockEngine::new(), &temp_dir);

        let artifact = state
            .synthesizer
            .workspace()
            .store(
                crate::speech::Language::French,
                VoiceStyle::Standard,
                AudioFormat::Mp3,
                b"abc",
            )
            .unwrap();
        state.store_artifact(artifact);

        assert_eq!(state.drain_artifacts().len(), 1);
        assert!(state.artifact(VoiceStyle::Standard).is_none());
    }
}
