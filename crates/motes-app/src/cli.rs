//! Root CLI structure for motes

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use motes_core::{EngineConfig, SceneKind};

#[derive(Parser, Debug)]
#[command(name = "motes")]
#[command(about = "Particle-lifecycle visualizations and a small memory console", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the built-in scenes
    List,

    /// Play a scene to completion
    Run(RunArgs),

    /// Open the interactive memory console
    Memory {
        /// Memory log file
        #[arg(long, default_value = motes_journal::DEFAULT_PATH)]
        path: PathBuf,
    },

    /// Search the memory log once and exit
    Recall {
        /// Word to look for in categories and contents
        keyword: String,

        /// Memory log file
        #[arg(long, default_value = motes_journal::DEFAULT_PATH)]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scene to play (see `motes list`)
    pub scene: SceneKind,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds between frames
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Particle pool capacity
    #[arg(long)]
    pub max_particles: Option<usize>,

    /// Produce frames as fast as possible
    #[arg(long)]
    pub unpaced: bool,

    /// Write every frame to this file as JSON lines
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// TOML file with run overrides
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Flags given on the command line, as a config layer.
    pub fn overrides(&self) -> EngineConfig {
        EngineConfig {
            frame_count: self.frames,
            max_particles: self.max_particles,
            interval_ms: self.interval_ms,
            seed: self.seed,
        }
    }
}
