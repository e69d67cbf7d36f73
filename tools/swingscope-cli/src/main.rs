//! SwingScope CLI: golf swing analysis over recorded pose tracks.
//!
//! Usage:
//!   swingscope analyze <TRACK>   Analyze a pose track and report the swing
//!   swingscope info <TRACK>      Show track header and pose coverage
//!   swingscope validate <PATH>   Check a file against the input limits
//!   swingscope synth <OUT>       Write a synthetic swing track
//!   swingscope config            Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use swingscope_analysis_engine::Settings;
use swingscope_processing_core::StrategyKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "swingscope",
    about = "Golf swing key-frame detection and evaluation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a pose track
    Analyze {
        /// Path to the pose track (.jsonl)
        track: PathBuf,

        /// Key-frame strategy: ratio|extremum
        #[arg(long)]
        strategy: Option<StrategyKind>,

        /// Maximum number of frames to analyze
        #[arg(long)]
        max_frames: Option<usize>,

        /// Include per-frame landmarks and angles in the report
        #[arg(long)]
        include_frames: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show track information
    Info {
        /// Path to the pose track (.jsonl)
        track: PathBuf,
    },

    /// Validate an input file
    Validate {
        /// Path to the file
        path: PathBuf,
    },

    /// Write a synthetic swing track
    Synth {
        /// Output track path
        out: PathBuf,

        /// Number of frames
        #[arg(long, default_value = "100")]
        frames: usize,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Peak side-to-side head drift (normalized)
        #[arg(long, default_value = "0.0")]
        head_sway: f64,

        /// Drop the pose on every n-th frame (0 keeps all)
        #[arg(long, default_value = "0")]
        dropout_every: usize,
    },

    /// Show the effective configuration
    Config {
        /// Persist it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => Settings::load(),
    };

    let mut logging = settings.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    swingscope_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            track,
            strategy,
            max_frames,
            include_frames,
            json,
            output,
        } => {
            let options = commands::analyze::Options {
                strategy,
                max_frames,
                include_frames,
                json,
                output,
            };
            commands::analyze::run(track, settings, options).await
        }
        Commands::Info { track } => commands::info::run(track),
        Commands::Validate { path } => commands::validate::run(path, settings),
        Commands::Synth {
            out,
            frames,
            fps,
            head_sway,
            dropout_every,
        } => commands::synth::run(out, frames, fps, head_sway, dropout_every),
        Commands::Config { write } => commands::config::run(settings, cli.config, write),
    }
}
