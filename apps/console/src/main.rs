//! Astralis console entry point.

mod app;
mod config;
mod script;

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "astralis-console", version, about = "Replay a log script through the Astralis console")]
struct Args {
    /// Replay script; reads stdin when omitted.
    script: Option<PathBuf>,

    /// Configuration file (defaults to ./astralis-console.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if args.json {
        config.output = OutputFormat::Json;
    }

    // Diagnostics go to stderr so stdout stays a clean report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Astralis console");

    let source = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let commands = script::parse(&source)?;
    tracing::debug!(commands = commands.len(), "script parsed");

    let stdout = std::io::stdout();
    let report = app::run(&config, &commands, &mut stdout.lock())?;

    tracing::info!(
        visible = report.visible,
        total = report.total,
        "replay finished"
    );
    Ok(())
}
