//! In-memory audio service

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AudioError, AudioService, AudioTarget};

/// Upper bound applied by stock firmware to the master volume
pub const FIRMWARE_VOLUME_CEILING: f32 = 1.0;

/// Snapshot of the simulated system audio state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioState {
    pub master_volume: f32,
    pub target: AudioTarget,
    #[serde(default)]
    pub fade_out_ns: u64,
    #[serde(default)]
    pub fade_in_ns: u64,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            target: AudioTarget::default(),
            fade_out_ns: 0,
            fade_in_ns: 0,
        }
    }
}

/// Audio service that keeps the system state in memory
///
/// Records every master volume it is handed, so callers can check that
/// changes are pushed one by one.
#[derive(Debug, Clone)]
pub struct MemoryAudio {
    state: AudioState,
    pushed: Vec<f32>,
    firmware_clamp: bool,
    failing: bool,
    initialized: bool,
}

impl MemoryAudio {
    /// Create a service reporting the given master volume
    pub fn new(master_volume: f32) -> Self {
        Self::from_state(AudioState {
            master_volume,
            ..AudioState::default()
        })
    }

    /// Create a service from a state snapshot
    pub fn from_state(state: AudioState) -> Self {
        Self {
            state,
            pushed: Vec::new(),
            firmware_clamp: false,
            failing: false,
            initialized: true,
        }
    }

    /// Clamp the volume to `[0, 1]` the way unpatched firmware does
    pub fn with_firmware_clamp(mut self, clamp: bool) -> Self {
        self.firmware_clamp = clamp;
        self
    }

    /// Make every request fail
    pub fn with_failures(mut self, failing: bool) -> Self {
        self.failing = failing;
        self
    }

    /// Get the current state
    pub fn state(&self) -> &AudioState {
        &self.state
    }

    /// Get every volume pushed so far, oldest first
    pub fn pushed(&self) -> &[f32] {
        &self.pushed
    }

    /// Get the current default output
    pub fn target(&self) -> AudioTarget {
        self.state.target
    }

    fn check(&self) -> Result<(), AudioError> {
        if !self.initialized {
            return Err(AudioError::NotInitialized);
        }
        if self.failing {
            return Err(AudioError::Rejected("simulated failure".to_string()));
        }
        Ok(())
    }
}

impl AudioService for MemoryAudio {
    fn init_services(&mut self) -> Result<(), AudioError> {
        self.initialized = true;
        Ok(())
    }

    fn exit_services(&mut self) {
        self.initialized = false;
    }

    fn master_volume(&self) -> Result<f32, AudioError> {
        self.check()?;
        Ok(self.state.master_volume)
    }

    fn set_master_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.check()?;
        if !volume.is_finite() {
            return Err(AudioError::Rejected(format!("volume {} is not finite", volume)));
        }

        let volume = if self.firmware_clamp {
            volume.clamp(0.0, FIRMWARE_VOLUME_CEILING)
        } else {
            volume
        };

        self.state.master_volume = volume;
        self.pushed.push(volume);
        Ok(())
    }

    fn set_default_target(
        &mut self,
        target: AudioTarget,
        fade_out: Duration,
        fade_in: Duration,
    ) -> Result<(), AudioError> {
        self.check()?;
        if target == AudioTarget::Invalid {
            return Err(AudioError::Rejected("invalid output target".to_string()));
        }

        self.state.target = target;
        self.state.fade_out_ns = fade_out.as_nanos() as u64;
        self.state.fade_in_ns = fade_in.as_nanos() as u64;
        Ok(())
    }
}
