//! vocalia web form entry point.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vocalia::artifact::Workspace;
use vocalia::backend::create_engine;
use vocalia::cli::Args;
use vocalia::pipeline::{SynthesisOutcome, Synthesizer};
use vocalia::speech::SpeechRequest;
use vocalia::web::{self, AppState};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(text) = args.generate.clone() {
        return generate_once(&args, &text);
    }

    serve(args)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// One-shot command-line synthesis, bypassing the web form.
fn generate_once(args: &Args, text: &str) -> Result<()> {
    let engine = create_engine(args.engine, &args.host);
    let workspace = Workspace::new().context("Failed to create artifact workspace")?;
    let synthesizer = Synthesizer::new(engine, workspace, args.engine.format());

    println!("Generating speech...");
    println!("  Language: {}", args.language.label());
    println!("  Style: {}", args.style);

    let request = SpeechRequest::new(text, args.language, args.style);
    match synthesizer.run(&request) {
        SynthesisOutcome::Ready(artifact) => {
            fs::copy(&artifact.path, &args.output).with_context(|| {
                format!("Failed to write output file: {}", args.output.display())
            })?;
            let size = fs::metadata(&args.output)?.len();

            println!("Audio saved to: {}", args.output.display());
            println!("  Size: {size} bytes");
            Ok(())
        }
        SynthesisOutcome::Invalid(err) => bail!("Invalid request: {err}"),
        SynthesisOutcome::Failed { message } => bail!(message),
    }
}

/// Serve the web form until interrupted.
fn serve(args: Args) -> Result<()> {
    let engine = create_engine(args.engine, &args.host);
    info!(
        "engine profile: {} at {}",
        args.engine.name(),
        engine.base_url()
    );

    let workspace = Workspace::new().context("Failed to create artifact workspace")?;
    info!("artifact workspace: {}", workspace.dir().display());

    let synthesizer = Synthesizer::new(engine, workspace, args.engine.format());
    let state = Arc::new(AppState::new(synthesizer));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(web::form::serve(state, args.listen))
        .context("Web form server failed")
}
