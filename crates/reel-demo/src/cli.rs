#![forbid(unsafe_code)]

//! Command line, logging setup, and the top-level run function.

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use reel_runtime::ViewerConfig;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::surface::TerminalSurface;
use crate::terminal::TerminalGuard;

#[derive(Debug, Parser)]
#[command(
    name = "reelfeed",
    about = "Scroll an endless feed of short clips in the terminal",
    version
)]
pub struct Cli {
    /// Viewer configuration file (.toml or .json).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Seed for clip sampling; overrides the config file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default `info`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Refuse every play with sound, as a locked-down browser would.
    #[arg(long)]
    pub deny_sound: bool,

    /// Clip identifiers; replaces the configured pool.
    pub clips: Vec<String>,
}

impl Cli {
    /// Resolve the effective viewer configuration.
    pub fn viewer_config(&self) -> Result<ViewerConfig, reel_runtime::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };
        if !self.clips.is_empty() {
            config.pool.clone_from(&self.clips);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| -> Box<dyn Error> { e })?;
    Ok(())
}

pub fn run_from_env() -> Result<(), Box<dyn Error>> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.viewer_config()?;
    tracing::info!(
        target: "reel.demo",
        clips = config.pool.len(),
        seed = ?config.seed,
        "starting viewer"
    );
    let viewer = config.build_viewer(TerminalSurface::new(cli.deny_sound))?;

    let _terminal = TerminalGuard::enter()?;
    App::new(viewer).run()?;
    Ok(())
}
