//! CLI interface for master-volume

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use master_volume::config::Preset;

/// Master volume panel with a perceptual slider curve
#[derive(Parser)]
#[command(name = "master-volume")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "master-volume.yaml")]
    pub config: PathBuf,

    /// Use the settings of a released panel revision instead of the config file
    #[arg(short, long, global = true, value_enum)]
    pub preset: Option<Preset>,

    /// Override the path of the saved volume record
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// JSON file standing in for the system audio service
    #[arg(long, global = true, default_value = "audio-state.json")]
    pub audio_state: PathBuf,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current volume, slider position and output target
    Show,

    /// Move the slider or set a volume directly
    Set(SetArgs),

    /// Press the Reset button
    Reset,

    /// Press the "Force speaker output" button
    Speaker,

    /// Open the interactive panel
    Panel,

    /// Print the slider curve
    Curve {
        /// Slider positions between rows
        #[arg(short, long, default_value = "10")]
        step: u8,
    },

    /// Validate a configuration file
    Check,

    /// Generate an example configuration file
    Init,

    /// Write an IPS patch that lifts the firmware volume clamp
    Patch {
        /// NSO executable of the audio service
        nso: PathBuf,

        /// Directory for the patch (default: next to the input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SetArgs {
    /// Slider position, 0 to 100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub position: Option<u8>,

    /// Volume within the configured range
    #[arg(long)]
    pub volume: Option<f32>,
}
