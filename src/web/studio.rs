//! Studio variant: all languages, preset or cloned voice, reference uploads.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use tracing::{info, warn};

use crate::backend::Engine;
use crate::pipeline::SynthesisOutcome;
use crate::reference::ReferenceStore;
use crate::speech::{Language, SpeechRequest, VoiceStyle};

use super::pages::{self, FormPage, PageOutcome};
use super::{AppState, run_blocking, shutdown_signal};

const TAGLINE: &str = "Turn your text into natural speech, or clone a voice from a reference clip";

/// Shared state of the studio variant.
pub struct StudioState<E: Engine> {
    pub app: AppState<E>,
    pub references: ReferenceStore,
}

impl<E: Engine> StudioState<E> {
    pub fn new(app: AppState<E>, references: ReferenceStore) -> Self {
        Self { app, references }
    }

    fn stored_names(&self) -> Vec<String> {
        match self.references.list() {
            Ok(clips) => clips.into_iter().map(|c| c.name).collect(),
            Err(err) => {
                warn!("Failed to list reference clips: {err}");
                Vec::new()
            }
        }
    }

    fn page(&self, stored: &[String], outcome: Option<&PageOutcome>) -> Html<String> {
        let page = FormPage {
            tagline: TAGLINE,
            languages: &Language::ALL,
            styles: &VoiceStyle::STUDIO,
            reference_upload: true,
            stored_references: stored,
        };
        Html(pages::render(&page, outcome))
    }
}

/// Build the router for the studio variant.
pub fn router<E: Engine + 'static>(state: Arc<StudioState<E>>) -> Router {
    Router::new()
        .route("/", get(index::<E>))
        .route("/synthesize", post(synthesize::<E>))
        .route("/audio/{style}", get(audio::<E>))
        .route("/download/{style}", get(download::<E>))
        .route("/references/{name}/delete", post(delete_reference::<E>))
        .with_state(state)
}

/// Serve the studio form until interrupted.
pub async fn serve<E: Engine + 'static>(
    state: Arc<StudioState<E>>,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("studio form available on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn index<E: Engine>(State(state): State<Arc<StudioState<E>>>) -> Html<String> {
    let stored = state.stored_names();
    state.page(&stored, None)
}

/// Fields collected from the multipart submission.
#[derive(Default)]
struct StudioForm {
    text: String,
    language: String,
    style: String,
    clip_name: String,
    reference: Option<Vec<u8>>,
    stored_reference: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<StudioForm, String> {
    let mut form = StudioForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid form upload: {e}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => {
                form.text = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
            }
            "language" => {
                form.language = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
            }
            "style" => {
                form.style = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
            }
            "clip_name" => {
                form.clip_name = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
            }
            "reference" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
                if !bytes.is_empty() {
                    form.reference = Some(bytes.to_vec());
                }
            }
            "stored_reference" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid form upload: {e}"))?;
                if !value.is_empty() {
                    form.stored_reference = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn synthesize<E: Engine + 'static>(
    State(state): State<Arc<StudioState<E>>>,
    mut multipart: Multipart,
) -> Html<String> {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(message) => {
            let stored = state.stored_names();
            return state.page(&stored, Some(&PageOutcome::Error(message)));
        }
    };

    let (Some(language), Some(style)) = (
        Language::from_code(&form.language),
        VoiceStyle::from_code(&form.style),
    ) else {
        let stored = state.stored_names();
        let outcome = PageOutcome::Error("Unknown language or voice style option".to_string());
        return state.page(&stored, Some(&outcome));
    };

    // An uploaded clip is saved first so it can be reused; otherwise a
    // previously stored clip may be selected.
    let reference = if let Some(bytes) = &form.reference {
        let name = if form.clip_name.is_empty() {
            "session"
        } else {
            form.clip_name.as_str()
        };
        match state
            .references
            .save(name, bytes)
            .and_then(|_| state.references.clip_path(name))
        {
            Ok(path) => Some(path),
            Err(err) => {
                let stored = state.stored_names();
                let outcome = PageOutcome::Error(format!("Could not store reference clip: {err}"));
                return state.page(&stored, Some(&outcome));
            }
        }
    } else if let Some(name) = &form.stored_reference {
        match state.references.clip_path(name) {
            Ok(path) => Some(path),
            Err(err) => {
                let stored = state.stored_names();
                let outcome = PageOutcome::Error(format!("Stored clip unavailable: {err}"));
                return state.page(&stored, Some(&outcome));
            }
        }
    } else {
        None
    };

    let mut request = SpeechRequest::new(form.text, language, style);
    if let Some(path) = reference {
        request = request.with_reference(path);
    }

    let worker = state.clone();
    let outcome = run_blocking(move || worker.app.synthesizer.run_with_release(&request)).await;

    if let SynthesisOutcome::Ready(artifact) = &outcome {
        state.app.store_artifact(artifact.clone());
    }

    let stored = state.stored_names();
    state.page(&stored, Some(&PageOutcome::from_outcome(&outcome)))
}

async fn audio<E: Engine>(
    State(state): State<Arc<StudioState<E>>>,
    Path(style): Path<String>,
) -> Response {
    let Some(style) = VoiceStyle::from_code(&style) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(artifact) = state.app.artifact(style) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, artifact.mime())], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Download the artifact and delete it afterwards: the studio variant keeps
/// nothing around once the file has been delivered.
async fn download<E: Engine>(
    State(state): State<Arc<StudioState<E>>>,
    Path(style): Path<String>,
) -> Response {
    let Some(style) = VoiceStyle::from_code(&style) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(artifact) = state.app.artifact(style) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let bytes = match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    if let Some(delivered) = state.app.take_artifact(style) {
        state.app.synthesizer.workspace().discard(&delivered);
    }

    (
        [
            (header::CONTENT_TYPE, artifact.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.download_name()),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn delete_reference<E: Engine>(
    State(state): State<Arc<StudioState<E>>>,
    Path(name): Path<String>,
) -> Redirect {
    if let Err(err) = state.references.delete(&name) {
        warn!(name, "Failed to delete reference clip: {err}");
    }
    Redirect::to("/")
}
