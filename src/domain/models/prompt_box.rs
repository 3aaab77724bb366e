#[cfg(test)]
#[path = "prompt_box_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use tui_textarea::TextArea;

const TITLE: &str = "Ask a question about ThinkScript (/help for commands)";

/// The multi-line question input below the conversation.
pub struct PromptBox {}

impl PromptBox {
    pub fn create<'a>() -> TextArea<'a> {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green))
                .title(TITLE)
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    pub fn input(textarea: &TextArea) -> String {
        return textarea.lines().join("\n");
    }
}
