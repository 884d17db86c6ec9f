//! Terminal rendition of the overlay panel
//!
//! Draws the overlay frame the way the console shows it:
//! - Title and version
//! - Volume header
//! - Track bar
//! - Reset and force-speaker items

mod host;
mod trackbar;

pub use host::{Focus, HostAction, PanelHost};
pub use trackbar::TrackBar;

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::audio::AudioService;
use crate::panel::{Panel, APP_TITLE, APP_VERSION, RESET_LABEL, SPEAKER_LABEL};

/// Render tick
const TICK: Duration = Duration::from_millis(50);

/// Run the panel in the terminal until the user closes it
pub fn run_panel<A: AudioService>(panel: &mut Panel<A>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, panel);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend, A: AudioService>(terminal: &mut Terminal<B>, panel: &mut Panel<A>) -> Result<()> {
    let mut host = PanelHost::new(panel.has_speaker_item());

    loop {
        panel.update();
        terminal.draw(|f| draw_ui(f, panel, &host))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if host.handle_key(key, panel) == HostAction::Close {
                    return Ok(());
                }
            }
        }
    }
}

fn draw_ui<A: AudioService>(f: &mut Frame, panel: &Panel<A>, host: &PanelHost) {
    let frame = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", APP_TITLE, APP_VERSION));
    let area = frame.inner(f.area());
    f.render_widget(frame, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Track bar
            Constraint::Length(3), // Reset
            Constraint::Length(3), // Force speaker
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        panel.header().to_string(),
        Style::default().fg(Color::Gray),
    )));
    f.render_widget(header, chunks[0]);

    draw_slider(f, chunks[1], panel, host.focus() == Focus::Slider);
    draw_item(f, chunks[2], RESET_LABEL, host.focus() == Focus::Reset);
    if panel.has_speaker_item() {
        draw_item(f, chunks[3], SPEAKER_LABEL, host.focus() == Focus::Speaker);
    }

    let hints = Paragraph::new(Line::from(vec![
        Span::raw(" ←/→: adjust  "),
        Span::raw("↑/↓: select  "),
        Span::raw("Enter: press  "),
        Span::raw("q: close"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[5]);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn draw_slider<A: AudioService>(f: &mut Frame, area: Rect, panel: &Panel<A>, focused: bool) {
    let bar = TrackBar::new(panel.slider_progress())
        .style(Style::default().fg(Color::Cyan))
        .knob_style(focus_style(focused))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(focused))
                .title(format!(" {} ", panel.slider_progress())),
        );

    f.render_widget(bar, area);
}

fn draw_item(f: &mut Frame, area: Rect, label: &str, focused: bool) {
    let item = Paragraph::new(Line::from(Span::styled(label.to_string(), focus_style(focused))))
        .block(Block::default().borders(Borders::ALL).border_style(focus_style(focused)));

    f.render_widget(item, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MemoryAudio;
    use crate::config::{MasterVolumeConfig, Preset};
    use ratatui::backend::TestBackend;

    fn rendered_text<A: AudioService>(panel: &Panel<A>, host: &PanelHost) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 16)).unwrap();
        terminal.draw(|f| draw_ui(f, panel, host)).unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draw_panel() {
        let mut config = MasterVolumeConfig::preset(Preset::Cubic);
        config.storage.enabled = false;
        let panel = Panel::open(&config, MemoryAudio::new(1.0));
        let host = PanelHost::new(panel.has_speaker_item());

        let text = rendered_text(&panel, &host);
        assert!(text.contains(APP_TITLE));
        assert!(text.contains("Volume: 1.00"));
        assert!(text.contains(RESET_LABEL));
        assert!(text.contains(SPEAKER_LABEL));
    }

    #[test]
    fn test_draw_panel_without_speaker_item() {
        let mut config = MasterVolumeConfig::preset(Preset::Linear);
        config.storage.enabled = false;
        let panel = Panel::open(&config, MemoryAudio::new(1.0));
        let host = PanelHost::new(panel.has_speaker_item());

        let text = rendered_text(&panel, &host);
        assert!(text.contains(RESET_LABEL));
        assert!(!text.contains(SPEAKER_LABEL));
    }
}
