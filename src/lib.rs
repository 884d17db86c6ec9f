//! MasterVolume - Master volume panel with a perceptual slider curve
//!
//! Maps a 0-100 slider onto a power-law volume range that reaches past
//! the firmware's unity ceiling, remembers the last volume across
//! sessions, and builds the IPS patch that lifts the firmware clamp.

pub mod audio;
pub mod config;
pub mod logging;
pub mod mapping;
pub mod panel;
pub mod patch;
pub mod storage;
pub mod viz;

pub use config::MasterVolumeConfig;
pub use panel::{MasterVolumeOverlay, Panel};
