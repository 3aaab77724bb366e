use std::collections::HashMap;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use super::ContentParser;
use crate::domain::models::Message;
use crate::domain::models::Role;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry {
    message_id: String,
    codeblocks_count: usize,
    text_len: usize,
    lines: Vec<Line<'static>>,
}

/// Rendered lines for every message in the conversation. Bubbles are only
/// rebuilt when their message changes or the window is resized.
pub struct BubbleList {
    cache: HashMap<usize, BubbleCacheEntry>,
    line_width: usize,
    lines_len: usize,
}

impl Default for BubbleList {
    fn default() -> BubbleList {
        return BubbleList::new();
    }
}

impl BubbleList {
    pub fn new() -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            line_width: 0,
            lines_len: 0,
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width || messages.len() < self.cache.len() {
            self.cache.clear();
            self.line_width = line_width;
        }

        let mut total_codeblock_counter = 0;
        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(cache_entry) = self.cache.get(&idx) {
                    if cache_entry.message_id == message.id
                        && cache_entry.text_len == message.content.len()
                    {
                        total_codeblock_counter += cache_entry.codeblocks_count;
                        return cache_entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                let mut codeblocks_count = 0;
                if message.role == Role::User {
                    align = BubbleAlignment::Right;
                } else {
                    codeblocks_count = ContentParser::parse(&message.content).code_blocks.len();
                }

                let bubble_lines =
                    Bubble::new(message, align, line_width, total_codeblock_counter).as_lines();
                let bubble_line_len = bubble_lines.len();
                total_codeblock_counter += codeblocks_count;

                self.cache.insert(
                    idx,
                    BubbleCacheEntry {
                        message_id: message.id.to_string(),
                        codeblocks_count,
                        text_len: message.content.len(),
                        lines: bubble_lines,
                    },
                );

                return bubble_line_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<'_, B>, rect: Rect, scroll: u16) {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();
        let lines: Vec<Line<'static>> = indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
