//! Track bar widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

use crate::mapping::STEP_MAX;

/// A horizontal slider showing a 0..=100 position
pub struct TrackBar<'a> {
    progress: u8,
    style: Style,
    knob_style: Style,
    block: Option<Block<'a>>,
}

impl<'a> TrackBar<'a> {
    pub fn new(progress: u8) -> Self {
        Self {
            progress: progress.min(STEP_MAX),
            style: Style::default(),
            knob_style: Style::default(),
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn knob_style(mut self, style: Style) -> Self {
        self.knob_style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Render the bar on the middle row of the given area
    fn render_bar(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let y = area.y + area.height / 2;
        let filled = self.progress as usize * width / STEP_MAX as usize;
        let knob = filled.min(width - 1);

        for x in 0..width {
            let screen_x = area.x + x as u16;
            if x == knob {
                buf.set_string(screen_x, y, "●", self.knob_style);
            } else if x < filled {
                buf.set_string(screen_x, y, "━", self.style);
            } else {
                buf.set_string(screen_x, y, "─", Style::default());
            }
        }
    }
}

impl Widget for TrackBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_bar(inner_area, buf);
    }
}
