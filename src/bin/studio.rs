//! vocalia-studio: voice-cloning form entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vocalia::artifact::Workspace;
use vocalia::backend::{Engine, create_engine};
use vocalia::cli::{EngineKind, StudioArgs};
use vocalia::pipeline::Synthesizer;
use vocalia::reference::ReferenceStore;
use vocalia::web::{self, AppState, StudioState};

fn main() -> Result<()> {
    let args = StudioArgs::parse();
    init_logging(args.verbose);

    let kind = EngineKind::Xtts;
    let engine = create_engine(kind, &args.host);
    info!("engine profile: {} at {}", kind.name(), engine.base_url());

    let workspace = Workspace::new().context("Failed to create artifact workspace")?;
    info!("artifact workspace: {}", workspace.dir().display());

    let synthesizer = Synthesizer::new(engine, workspace, kind.format());
    let references = match args.reference_dir {
        Some(dir) => ReferenceStore::with_dir(dir),
        None => ReferenceStore::new(),
    };
    info!("reference clips: {}", references.clips_dir().display());

    let state = Arc::new(StudioState::new(AppState::new(synthesizer), references));

    // Report device availability up front, the way the engine sees it.
    match state.app.synthesizer.health() {
        Ok(report) => info!(
            cuda = report.cuda_available,
            gpu = report.gpu.as_deref().unwrap_or("none"),
            device = %report.device,
            "engine online"
        ),
        Err(err) => warn!("Engine not reachable yet: {err}"),
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let served = runtime.block_on(web::studio::serve(state.clone(), args.listen));

    cleanup(&state);

    served.context("Studio server failed")
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Final sweep after the serving loop stops: drop leftover artifacts and
/// free engine device memory. Both are best-effort.
fn cleanup<E: Engine>(state: &StudioState<E>) {
    for artifact in state.app.drain_artifacts() {
        state.app.synthesizer.workspace().discard(&artifact);
    }

    if let Err(err) = state.app.synthesizer.release() {
        warn!("Failed to release engine device memory: {err}");
    }

    info!("cleanup complete");
}
