#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;

use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Shown in place of the prompt while an answer streams in. Advances one
/// frame per UI tick.
#[derive(Default)]
pub struct Loading {
    frame: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn text(&self) -> String {
        return format!("Searching the knowledge base{:<3}", FRAMES[self.frame]);
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<'_, B>, rect: Rect) {
        frame.render_widget(
            Paragraph::new(self.text())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
