//! Host audio control service
//!
//! The panel never talks to audio hardware itself. It reads and writes the
//! system master volume and switches the default output through an
//! [`AudioService`], which the host provides.

mod memory;
mod state_file;

pub use memory::{AudioState, MemoryAudio, FIRMWARE_VOLUME_CEILING};
pub use state_file::StateFileAudio;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by an audio service
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio service is not initialized")]
    NotInitialized,

    #[error("audio service rejected the request: {0}")]
    Rejected(String),

    #[error("audio state could not be stored: {0}")]
    State(String),
}

/// Selectable audio output devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioTarget {
    Invalid,
    #[default]
    Speaker,
    Headphone,
    Tv,
    UsbOutputDevice,
    Bluetooth,
}

impl fmt::Display for AudioTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioTarget::Invalid => "invalid",
            AudioTarget::Speaker => "speaker",
            AudioTarget::Headphone => "headphone",
            AudioTarget::Tv => "tv",
            AudioTarget::UsbOutputDevice => "usb",
            AudioTarget::Bluetooth => "bluetooth",
        };
        f.write_str(name)
    }
}

/// Trait for the system audio control service
pub trait AudioService {
    /// Open the service session
    fn init_services(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    /// Close the service session
    fn exit_services(&mut self) {}

    /// Get the current master volume
    fn master_volume(&self) -> Result<f32, AudioError>;

    /// Set the master volume
    fn set_master_volume(&mut self, volume: f32) -> Result<(), AudioError>;

    /// Switch the default output, fading the old target out and the new one in
    fn set_default_target(
        &mut self,
        target: AudioTarget,
        fade_out: Duration,
        fade_in: Duration,
    ) -> Result<(), AudioError>;
}
