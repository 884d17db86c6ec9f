//! Overlay lifecycle hooks

use anyhow::{anyhow, Result};

use super::Panel;
use crate::audio::{AudioError, AudioService};
use crate::config::MasterVolumeConfig;

/// Lifecycle hooks the overlay host calls
pub trait Overlay {
    /// The GUI shown when the overlay opens
    type Gui;

    /// Open the services the overlay depends on
    fn init_services(&mut self) -> Result<(), AudioError>;

    /// Close the services again
    fn exit_services(&mut self);

    /// The overlay became visible
    fn on_show(&mut self) {}

    /// The overlay was hidden
    fn on_hide(&mut self) {}

    /// Build the first GUI
    fn load_initial_gui(&mut self) -> Result<Self::Gui>;
}

/// Overlay hosting the master volume panel
///
/// The audio service is lent to the panel while it is open and returned
/// by [`MasterVolumeOverlay::close_gui`].
pub struct MasterVolumeOverlay<A: AudioService> {
    config: MasterVolumeConfig,
    audio: Option<A>,
    visible: bool,
}

impl<A: AudioService> MasterVolumeOverlay<A> {
    pub fn new(config: MasterVolumeConfig, audio: A) -> Self {
        Self {
            config,
            audio: Some(audio),
            visible: false,
        }
    }

    /// Close a panel and take its audio service back
    pub fn close_gui(&mut self, panel: Panel<A>) {
        self.audio = Some(panel.close());
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn config(&self) -> &MasterVolumeConfig {
        &self.config
    }

    /// Get the audio service, if no panel holds it
    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }
}

impl<A: AudioService> Overlay for MasterVolumeOverlay<A> {
    type Gui = Panel<A>;

    fn init_services(&mut self) -> Result<(), AudioError> {
        match self.audio.as_mut() {
            Some(audio) => audio.init_services(),
            None => Ok(()),
        }
    }

    fn exit_services(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.exit_services();
        }
    }

    fn on_show(&mut self) {
        self.visible = true;
    }

    fn on_hide(&mut self) {
        self.visible = false;
    }

    fn load_initial_gui(&mut self) -> Result<Panel<A>> {
        let audio = self
            .audio
            .take()
            .ok_or_else(|| anyhow!("the panel is already open"))?;
        Ok(Panel::open(&self.config, audio))
    }
}
