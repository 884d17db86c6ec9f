//! The master volume panel
//!
//! Holds the widget state the overlay shows (header text, slider
//! progress, list items) and the listeners the host calls on input.
//! Every change is pushed to the audio service immediately.

mod overlay;
mod setting;

pub use overlay::{MasterVolumeOverlay, Overlay};
pub use setting::VolumeSetting;

use crate::audio::{AudioService, AudioTarget};
use crate::config::{MasterVolumeConfig, OutputConfig};
use crate::storage::VolumeStore;

/// Controller button bits, as delivered to click listeners
pub mod buttons {
    pub const A: u64 = 1 << 0;
    pub const B: u64 = 1 << 1;
    pub const X: u64 = 1 << 2;
    pub const Y: u64 = 1 << 3;
    pub const LEFT: u64 = 1 << 12;
    pub const UP: u64 = 1 << 13;
    pub const RIGHT: u64 = 1 << 14;
    pub const DOWN: u64 = 1 << 15;
}

/// Title shown on the overlay frame
pub const APP_TITLE: &str = "MasterVolume";

/// Version shown on the overlay frame
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label of the reset list item
pub const RESET_LABEL: &str = "Reset";

/// Label of the force-speaker list item
pub const SPEAKER_LABEL: &str = "Force speaker output";

/// Where the volume shown at open came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeOrigin {
    /// Read back from the volume record
    Stored,
    /// Queried from the audio service
    Live,
    /// Neither was available
    Default,
}

/// Master volume panel bound to an audio service
pub struct Panel<A: AudioService> {
    audio: A,
    setting: VolumeSetting,
    store: Option<VolumeStore>,
    output: OutputConfig,
    origin: VolumeOrigin,
    header: String,
    progress: u8,
}

impl<A: AudioService> Panel<A> {
    /// Open the panel
    ///
    /// The starting volume is the stored one when persistence is enabled
    /// and the record is readable and in range, otherwise the live volume,
    /// otherwise the default. A restored volume is pushed to the service.
    pub fn open(config: &MasterVolumeConfig, mut audio: A) -> Self {
        let mut setting = VolumeSetting::from_config(&config.curve, config.curve.default as f32);
        let store = config
            .storage
            .enabled
            .then(|| VolumeStore::new(&config.storage.path));

        let stored = store.as_ref().and_then(|store| match store.load() {
            Ok(value) if setting.contains(value) => Some(value),
            Ok(value) => {
                log::debug!("ignoring stored volume {} outside the configured range", value);
                None
            }
            Err(e) => {
                log::debug!("no stored volume: {}", e);
                None
            }
        });

        let origin = if let Some(value) = stored {
            setting.set_value(value);
            if let Err(e) = audio.set_master_volume(setting.value()) {
                log::warn!("failed to restore master volume: {}", e);
            }
            VolumeOrigin::Stored
        } else {
            match audio.master_volume() {
                Ok(value) => {
                    setting.set_value(value);
                    VolumeOrigin::Live
                }
                Err(e) => {
                    log::warn!("failed to query master volume: {}", e);
                    VolumeOrigin::Default
                }
            }
        };

        let progress = setting.position();
        let mut panel = Self {
            audio,
            setting,
            store,
            output: config.output.clone(),
            origin,
            header: String::new(),
            progress,
        };
        panel.update();
        panel
    }

    /// Slider listener: the user moved the track bar
    pub fn on_slider_changed(&mut self, step: u8) {
        let value = self.setting.set_position(step);
        self.progress = crate::mapping::clamp_step(step);
        self.push(value);
    }

    /// Set the volume directly and move the slider to match
    pub fn set_volume(&mut self, value: f32) -> f32 {
        let value = self.setting.set_value(value);
        self.progress = self.setting.position();
        self.push(value);
        value
    }

    /// Reset item listener; returns whether the input was handled
    pub fn on_reset_click(&mut self, keys: u64) -> bool {
        if keys & buttons::A == 0 {
            return false;
        }

        let value = self.setting.reset();
        self.progress = self.setting.position();
        self.push(value);
        true
    }

    /// Force-speaker item listener; returns whether the input was handled
    pub fn on_force_speaker_click(&mut self, keys: u64) -> bool {
        if !self.has_speaker_item() || keys & buttons::A == 0 {
            return false;
        }

        if let Err(e) = self.audio.set_default_target(
            AudioTarget::Speaker,
            self.output.fade_out(),
            self.output.fade_in(),
        ) {
            log::warn!("failed to switch output to speakers: {}", e);
        }
        true
    }

    /// Render tick: refresh the header text
    pub fn update(&mut self) -> &str {
        self.header = format!("Volume: {:.2}", self.setting.value());
        &self.header
    }

    /// Close the panel, saving the volume when persistence is enabled
    pub fn close(self) -> A {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(self.setting.value()) {
                log::debug!("volume not saved: {}", e);
            }
        }
        self.audio
    }

    /// Get the header text as of the last update
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Get the slider position
    pub fn slider_progress(&self) -> u8 {
        self.progress
    }

    /// Get the current volume
    pub fn value(&self) -> f32 {
        self.setting.value()
    }

    /// Get the volume setting
    pub fn setting(&self) -> &VolumeSetting {
        &self.setting
    }

    /// Get where the starting volume came from
    pub fn origin(&self) -> VolumeOrigin {
        self.origin
    }

    /// Whether the force-speaker item is shown
    pub fn has_speaker_item(&self) -> bool {
        self.output.force_speaker
    }

    /// Get the audio service
    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn push(&mut self, value: f32) {
        if let Err(e) = self.audio.set_master_volume(value) {
            log::warn!("failed to set master volume: {}", e);
        }
    }
}
