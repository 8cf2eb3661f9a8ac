//! Web form variant: standard/slow synthesis over the form languages.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tracing::info;

use crate::backend::Engine;
use crate::pipeline::SynthesisOutcome;
use crate::speech::{Language, SpeechRequest, VoiceStyle};

use super::pages::{self, FormPage, PageOutcome};
use super::{AppState, run_blocking, shutdown_signal};

const TAGLINE: &str = "Turn your text into natural speech";

fn page_def() -> FormPage<'static> {
    FormPage {
        tagline: TAGLINE,
        languages: &Language::FORM,
        styles: &VoiceStyle::FORM,
        reference_upload: false,
        stored_references: &[],
    }
}

/// Form fields posted by the page.
#[derive(Debug, Deserialize)]
pub struct SynthesizeForm {
    pub text: String,
    pub language: String,
    pub style: String,
}

/// Build the router for the form variant.
pub fn router<E: Engine + 'static>(state: Arc<AppState<E>>) -> Router {
    Router::new()
        .route("/", get(index::<E>))
        .route("/synthesize", post(synthesize::<E>))
        .route("/audio/{style}", get(audio::<E>))
        .route("/download/{style}", get(download::<E>))
        .with_state(state)
}

/// Serve the form until interrupted.
pub async fn serve<E: Engine + 'static>(
    state: Arc<AppState<E>>,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("web form available on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn index<E: Engine>(State(_state): State<Arc<AppState<E>>>) -> Html<String> {
    Html(pages::render(&page_def(), None))
}

async fn synthesize<E: Engine + 'static>(
    State(state): State<Arc<AppState<E>>>,
    Form(form): Form<SynthesizeForm>,
) -> Html<String> {
    let (Some(language), Some(style)) = (
        Language::from_code(&form.language),
        VoiceStyle::from_code(&form.style),
    ) else {
        let outcome = PageOutcome::Error("Unknown language or voice style option".to_string());
        return Html(pages::render(&page_def(), Some(&outcome)));
    };

    let request = SpeechRequest::new(form.text, language, style);
    let worker = state.clone();
    let outcome = run_blocking(move || worker.synthesizer.run(&request)).await;

    if let SynthesisOutcome::Ready(artifact) = &outcome {
        state.store_artifact(artifact.clone());
    }

    Html(pages::render(
        &page_def(),
        Some(&PageOutcome::from_outcome(&outcome)),
    ))
}

async fn audio<E: Engine>(
    State(state): State<Arc<AppState<E>>>,
    Path(style): Path<String>,
) -> Response {
    let Some(style) = VoiceStyle::from_code(&style) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(artifact) = state.artifact(style) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, artifact.mime())], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn download<E: Engine>(
    State(state): State<Arc<AppState<E>>>,
    Path(style): Path<String>,
) -> Response {
    let Some(style) = VoiceStyle::from_code(&style) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(artifact) = state.artifact(style) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, artifact.mime().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.download_name()),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
