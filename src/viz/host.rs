//! Keyboard focus and input routing for the terminal panel

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::audio::AudioService;
use crate::mapping::STEP_MAX;
use crate::panel::{buttons, Panel};

/// Slider steps per arrow key press
const STEP: u8 = 1;

/// Slider steps per arrow key press with Shift held
const COARSE_STEP: u8 = 10;

/// Focusable panel elements, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Slider,
    Reset,
    Speaker,
}

/// What the host loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Continue,
    Close,
}

/// Routes keys to the focused panel element
#[derive(Debug, Clone)]
pub struct PanelHost {
    focus: Focus,
    speaker: bool,
}

impl PanelHost {
    pub fn new(has_speaker_item: bool) -> Self {
        Self {
            focus: Focus::Slider,
            speaker: has_speaker_item,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Handle a key press
    pub fn handle_key<A: AudioService>(&mut self, key: KeyEvent, panel: &mut Panel<A>) -> HostAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('b'), _) | (KeyCode::Esc, _) => {
                return HostAction::Close;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return HostAction::Close,
            (KeyCode::Up, _) => self.focus_previous(),
            (KeyCode::Down, _) => self.focus_next(),
            (KeyCode::Left, modifiers) if self.focus == Focus::Slider => {
                let step = Self::step(modifiers);
                panel.on_slider_changed(panel.slider_progress().saturating_sub(step));
            }
            (KeyCode::Right, modifiers) if self.focus == Focus::Slider => {
                let step = Self::step(modifiers);
                let target = panel.slider_progress().saturating_add(step).min(STEP_MAX);
                panel.on_slider_changed(target);
            }
            (KeyCode::Home, _) if self.focus == Focus::Slider => panel.on_slider_changed(0),
            (KeyCode::End, _) if self.focus == Focus::Slider => panel.on_slider_changed(STEP_MAX),
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) | (KeyCode::Char('a'), _) => {
                self.press(buttons::A, panel);
            }
            _ => {}
        }

        HostAction::Continue
    }

    fn press<A: AudioService>(&self, keys: u64, panel: &mut Panel<A>) -> bool {
        match self.focus {
            Focus::Slider => false,
            Focus::Reset => panel.on_reset_click(keys),
            Focus::Speaker => panel.on_force_speaker_click(keys),
        }
    }

    fn step(modifiers: KeyModifiers) -> u8 {
        if modifiers.contains(KeyModifiers::SHIFT) {
            COARSE_STEP
        } else {
            STEP
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Slider => Focus::Reset,
            Focus::Reset if self.speaker => Focus::Speaker,
            Focus::Reset => Focus::Reset,
            Focus::Speaker => Focus::Speaker,
        };
    }

    fn focus_previous(&mut self) {
        self.focus = match self.focus {
            Focus::Slider | Focus::Reset => Focus::Slider,
            Focus::Speaker => Focus::Reset,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioTarget, AudioState, MemoryAudio};
    use crate::config::{MasterVolumeConfig, Preset};

    fn panel(preset: Preset, audio: MemoryAudio) -> Panel<MemoryAudio> {
        let mut config = MasterVolumeConfig::preset(preset);
        config.storage.enabled = false;
        Panel::open(&config, audio)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_move_slider() {
        let mut panel = panel(Preset::Linear, MemoryAudio::new(1.0));
        let mut host = PanelHost::new(panel.has_speaker_item());
        assert_eq!(panel.slider_progress(), 50);

        host.handle_key(key(KeyCode::Right), &mut panel);
        assert_eq!(panel.slider_progress(), 51);

        host.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT), &mut panel);
        assert_eq!(panel.slider_progress(), 41);

        host.handle_key(key(KeyCode::End), &mut panel);
        host.handle_key(key(KeyCode::Right), &mut panel);
        assert_eq!(panel.slider_progress(), 100);
        assert_eq!(panel.value(), 2.0);

        host.handle_key(key(KeyCode::Home), &mut panel);
        host.handle_key(key(KeyCode::Left), &mut panel);
        assert_eq!(panel.slider_progress(), 0);
    }

    #[test]
    fn test_focus_skips_hidden_speaker_item() {
        let mut panel = panel(Preset::Quadratic, MemoryAudio::new(1.0));
        let mut host = PanelHost::new(panel.has_speaker_item());

        host.handle_key(key(KeyCode::Down), &mut panel);
        host.handle_key(key(KeyCode::Down), &mut panel);
        assert_eq!(host.focus(), Focus::Reset);

        host.handle_key(key(KeyCode::Up), &mut panel);
        host.handle_key(key(KeyCode::Up), &mut panel);
        assert_eq!(host.focus(), Focus::Slider);
    }

    #[test]
    fn test_arrows_ignored_off_slider() {
        let mut panel = panel(Preset::Linear, MemoryAudio::new(1.0));
        let mut host = PanelHost::new(false);

        host.handle_key(key(KeyCode::Down), &mut panel);
        host.handle_key(key(KeyCode::Right), &mut panel);
        assert_eq!(panel.slider_progress(), 50);
        assert!(panel.audio().pushed().is_empty());
    }

    #[test]
    fn test_enter_presses_focused_item() {
        let audio = MemoryAudio::from_state(AudioState {
            master_volume: 6.0,
            target: AudioTarget::Headphone,
            ..Default::default()
        });
        let mut panel = panel(Preset::Cubic, audio);
        let mut host = PanelHost::new(panel.has_speaker_item());

        // Nothing to press on the slider
        host.handle_key(key(KeyCode::Enter), &mut panel);
        assert_eq!(panel.value(), 6.0);

        host.handle_key(key(KeyCode::Down), &mut panel);
        host.handle_key(key(KeyCode::Enter), &mut panel);
        assert_eq!(panel.value(), 1.0);

        host.handle_key(key(KeyCode::Down), &mut panel);
        assert_eq!(host.focus(), Focus::Speaker);
        host.handle_key(key(KeyCode::Char('a')), &mut panel);
        assert_eq!(panel.audio().target(), AudioTarget::Speaker);
    }

    #[test]
    fn test_close_keys() {
        let mut panel = panel(Preset::Linear, MemoryAudio::new(1.0));
        let mut host = PanelHost::new(false);

        assert_eq!(host.handle_key(key(KeyCode::Esc), &mut panel), HostAction::Close);
        assert_eq!(host.handle_key(key(KeyCode::Char('q')), &mut panel), HostAction::Close);
        assert_eq!(
            host.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut panel),
            HostAction::Close
        );
        assert_eq!(host.handle_key(key(KeyCode::Tab), &mut panel), HostAction::Continue);
    }
}
