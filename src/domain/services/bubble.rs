#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::content_parser::strip_bold;
use super::ContentParser;
use crate::domain::models::Block;
use crate::domain::models::Message;
use crate::domain::models::Role;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
    codeblock_counter: usize,
}

struct Row {
    text: String,
    style: Style,
}

impl Row {
    fn new(text: String, style: Style) -> Row {
        return Row { text, style };
    }

    fn len(&self) -> usize {
        return self.text.chars().count();
    }
}

// "│ " and " │" around each row.
const BORDER_WIDTH: usize = 4;
const SCROLLBAR_WIDTH: usize = 1;
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

fn split_chars(text: &str, width: usize) -> Vec<String> {
    let chars = text.chars().collect::<Vec<char>>();
    if chars.len() <= width {
        return vec![text.to_string()];
    }

    return chars
        .chunks(width)
        .map(|chunk| return chunk.iter().collect::<String>())
        .collect();
}

/// Word wraps a single line, splitting words that are wider than the line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = vec![];
    let mut current: Vec<String> = vec![];
    let mut current_len = 0;

    let words = text
        .replace('\t', "  ")
        .split(' ')
        .flat_map(|word| return split_chars(word, width))
        .collect::<Vec<String>>();

    for word in words {
        let word_len = word.chars().count();
        if !current.is_empty() && current_len + 1 + word_len > width {
            lines.push(current.join(" "));
            current = vec![];
            current_len = 0;
        }

        if !current.is_empty() {
            current_len += 1;
        }
        current_len += word_len;
        current.push(word);
    }
    lines.push(current.join(" "));

    return lines;
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
        codeblock_counter: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
            codeblock_counter,
        };
    }

    fn max_text_width(&self) -> usize {
        let outer_padding = (self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil() as usize;
        return self
            .window_max_width
            .saturating_sub(BORDER_WIDTH + SCROLLBAR_WIDTH + outer_padding)
            .max(1);
    }

    fn wrapped(text: &str, width: usize, style: Style) -> Vec<Row> {
        return wrap(text, width)
            .into_iter()
            .map(|line| return Row::new(line, style))
            .collect();
    }

    fn code_rows(&self, idx: usize, code: &str, width: usize) -> Vec<Row> {
        let frame_style = Style::default().fg(Color::DarkGray);
        let code_style = Style::default().fg(Color::Yellow);
        let number = self.codeblock_counter + idx + 1;

        let mut rows = vec![Row::new(format!("┌─ code ({number})"), frame_style)];
        for line in code.replace('\t', "  ").lines() {
            for part in split_chars(line, width.saturating_sub(2).max(1)) {
                rows.push(Row::new(format!("│ {part}"), code_style));
            }
        }
        rows.push(Row::new("└─".to_string(), frame_style));

        return rows;
    }

    fn rows(&self, width: usize) -> Vec<Row> {
        if self.message.role == Role::User {
            return self
                .message
                .content
                .split('\n')
                .flat_map(|line| return Bubble::wrapped(line, width, Style::default()))
                .collect();
        }

        let parsed = ContentParser::parse(&self.message.content);
        let heading_style = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED);
        let subheading_style = Style::default().add_modifier(Modifier::BOLD);

        let mut rows = vec![];
        for block in parsed.blocks.iter() {
            match block {
                Block::Heading(idx) => {
                    rows.extend(Bubble::wrapped(&parsed.headings[*idx], width, heading_style));
                }
                Block::Subheading(_, line) => {
                    rows.extend(Bubble::wrapped(&strip_bold(line), width, subheading_style));
                }
                Block::Code(idx) => {
                    rows.extend(self.code_rows(*idx, &parsed.code_blocks[*idx], width));
                }
                Block::Text(text) => {
                    rows.extend(Bubble::wrapped(text, width, Style::default()));
                }
                Block::Break => {
                    rows.push(Row::new("".to_string(), Style::default()));
                }
            }
        }

        while rows.last().map_or(false, |row| return row.text.is_empty()) {
            rows.pop();
        }

        return rows;
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let mut rows = self.rows(self.max_text_width());
        if rows.is_empty() {
            rows.push(Row::new("".to_string(), Style::default()));
        }

        let label = self.message.role.label();
        let label_len = label.chars().count();
        let inner_width = rows
            .iter()
            .map(|row| return row.len())
            .max()
            .unwrap_or(0)
            .max(label_len);

        let mut border_style = Style::default().fg(Color::Cyan);
        if self.message.role == Role::User {
            border_style = Style::default().fg(Color::Green);
        }

        let mut indent = "".to_string();
        if self.alignment == BubbleAlignment::Right {
            let bubble_width = inner_width + BORDER_WIDTH + SCROLLBAR_WIDTH;
            indent = " ".repeat(self.window_max_width.saturating_sub(bubble_width));
        }

        let mut lines = vec![Line::from(vec![
            Span::raw(indent.to_string()),
            Span::styled(
                format!("╭{label}{}╮", "─".repeat(inner_width + 2 - label_len)),
                border_style,
            ),
        ])];

        for row in rows {
            let padding = " ".repeat(inner_width - row.len());
            lines.push(Line::from(vec![
                Span::raw(indent.to_string()),
                Span::styled("│ ", border_style),
                Span::styled(row.text, row.style),
                Span::raw(padding),
                Span::styled(" │", border_style),
            ]));
        }

        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled(format!("╰{}╯", "─".repeat(inner_width + 2)), border_style),
        ]));

        return lines;
    }
}
