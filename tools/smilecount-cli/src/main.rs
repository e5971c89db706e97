//! SmileCount CLI — Command-line interface for smile event counting.
//!
//! Usage:
//!   smilecount replay <PATH>     Count smiles in a recorded frame stream
//!   smilecount validate <PATH>   Check a frame stream for missing categories
//!   smilecount synth [OPTIONS]   Write a synthetic frame stream

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use smilecount_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "smilecount",
    about = "Count smiles per face from blendshape frame streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSONL frame stream through the smile tracker
    Replay {
        /// Path to the frame stream
        path: PathBuf,

        /// Smile threshold in [0, 1] (defaults to the configured value)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Pace frames at the stream's frame rate and print live counts
        #[arg(long)]
        realtime: bool,

        /// Frame rate used with --realtime (defaults to the stream header)
        #[arg(long)]
        fps: Option<u32>,
    },

    /// Validate a JSONL frame stream
    Validate {
        /// Path to the frame stream
        path: PathBuf,
    },

    /// Write a deterministic synthetic frame stream
    Synth {
        /// Number of faces per frame
        #[arg(long, default_value = "2")]
        faces: usize,

        /// Number of frames
        #[arg(long, default_value = "300")]
        frames: usize,

        /// Frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Smile cycle length in frames
        #[arg(long, default_value = "60")]
        period: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load();

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    smilecount_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay {
            path,
            threshold,
            json,
            realtime,
            fps,
        } => {
            commands::replay::run(
                path,
                threshold.unwrap_or(config.tracker.threshold),
                json,
                realtime,
                fps,
                config.replay.fps,
            )
            .await
        }
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Synth {
            faces,
            frames,
            fps,
            period,
            output,
        } => commands::synth::run(faces, frames, fps, period, output),
    }
}
