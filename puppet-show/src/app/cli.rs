//! Command-Line Interface

use crate::playback::PlaybackMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Puppet Show - Record hand poses and replay them as a two-handed puppet
#[derive(Parser, Debug)]
#[command(name = "puppet-show")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a detection dump (JSON Lines of raw poses) into a keyframe recording
    Capture {
        /// Input detection dump
        #[arg(short, long)]
        input: PathBuf,

        /// Output recording name (without extension)
        #[arg(short, long)]
        output: Option<String>,

        /// Session end time in ms (defaults to the last pose timestamp)
        #[arg(short, long)]
        end_ms: Option<f64>,
    },

    /// Replay a recording, printing per-tick frames as JSON Lines
    Play {
        /// Input recording file
        #[arg(short, long)]
        input: PathBuf,

        /// Playback mode (overrides config)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Ticks per second (overrides config)
        #[arg(short, long)]
        tick_rate: Option<u32>,

        /// Tick against the wall clock instead of stepping a manual clock
        #[arg(long)]
        realtime: bool,

        /// Print rig transforms instead of hand features
        #[arg(long)]
        rig: bool,
    },

    /// Summarize a recording file
    Inspect {
        /// Path to recording
        file: PathBuf,
    },

    /// List recordings
    List {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Playback mode as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Nearest,
    Interpolated,
}

impl From<ModeArg> for PlaybackMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Nearest => PlaybackMode::Nearest,
            ModeArg::Interpolated => PlaybackMode::Interpolated,
        }
    }
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "playback.mode", "recorder.motion_threshold")
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the recording directory
    pub fn recordings_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".puppet_show").join("recordings"))
            .unwrap_or_else(|| PathBuf::from("recordings"))
    }
}
