use anyhow::Context;
use clap::Parser;
use relay::{Echo, Script, load_config};
use relay_events::{GlobalEvents, global};
use relay_logger::Logger;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Replays event scripts against the process-wide registry.
#[derive(Debug, Parser)]
#[command(name = "relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fire and observe named events from a script")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML); `RELAY__*` variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Script to run; reads stdin when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.log)?;

    let source = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read script from stdin")?,
    };
    let script = Script::parse(&source)?;

    global::install(GlobalEvents::with_config(cfg.notifier.clone()))?;
    Echo::stdout().subscribe(global::events()?, &cfg.subscriptions)?;

    script.run(global::events()?)?;

    Ok(())
}
