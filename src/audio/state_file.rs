//! Audio service backed by a JSON state file
//!
//! Lets the panel run off-device: each CLI invocation sees the "system"
//! volume and output target left behind by the previous one.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{AudioError, AudioService, AudioState, AudioTarget, MemoryAudio};

/// Audio service whose state lives in a JSON file
pub struct StateFileAudio {
    path: PathBuf,
    inner: MemoryAudio,
}

impl StateFileAudio {
    /// Open the state file, starting from defaults when it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AudioError> {
        let path = path.into();

        let state = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| AudioError::State(format!("{:?}: {}", path, e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| AudioError::State(format!("{:?}: {}", path, e)))?
        } else {
            AudioState::default()
        };

        Ok(Self {
            path,
            inner: MemoryAudio::from_state(state),
        })
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current state
    pub fn state(&self) -> &AudioState {
        self.inner.state()
    }

    fn persist(&self) -> Result<(), AudioError> {
        let contents = serde_json::to_string_pretty(self.inner.state())
            .map_err(|e| AudioError::State(e.to_string()))?;
        fs::write(&self.path, contents)
            .map_err(|e| AudioError::State(format!("{:?}: {}", self.path, e)))
    }
}

impl AudioService for StateFileAudio {
    fn init_services(&mut self) -> Result<(), AudioError> {
        self.inner.init_services()
    }

    fn exit_services(&mut self) {
        self.inner.exit_services();
    }

    fn master_volume(&self) -> Result<f32, AudioError> {
        self.inner.master_volume()
    }

    fn set_master_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.inner.set_master_volume(volume)?;
        self.persist()
    }

    fn set_default_target(
        &mut self,
        target: AudioTarget,
        fade_out: Duration,
        fade_in: Duration,
    ) -> Result<(), AudioError> {
        self.inner.set_default_target(target, fade_out, fade_in)?;
        self.persist()
    }
}
