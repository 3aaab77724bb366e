#[cfg(test)]
#[path = "content_parser_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::Block;
use crate::domain::models::ParsedContent;
use crate::domain::models::Subheading;

static HEADING: Lazy<Regex> = Lazy::new(|| return Regex::new(r"^#\s+(.+)$").unwrap());
static BULLET_HEADING: Lazy<Regex> = Lazy::new(|| return Regex::new(r"^###\s+(.+)$").unwrap());
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| return Regex::new(r"^(\d+)\.\s*(.+)$").unwrap());
static COLON_SUBHEADING: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"^[-•]\s*(.+?)(:\s*(.+))?$").unwrap());

/// What a single line of a message is, judged on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    CodeFence,
    Heading(String),
    BulletHeading(String),
    /// Parsed number, the number as written, and the item text.
    NumberedItem(u64, String, String),
    /// Subheading text, and whether a description follows the colon.
    ColonSubheading(String, bool),
    PlainText,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListMode {
    Prose,
    /// Entered on the first numbered item and never left.
    Numbered,
}

pub fn strip_bold(text: &str) -> String {
    return text.replace("**", "");
}

/// Classifies a line, ignoring any state from previous lines. Rules are tried
/// in precedence order and the first match wins.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with("```") {
        return LineKind::CodeFence;
    }

    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = HEADING.captures(line) {
        return LineKind::Heading(caps[1].trim().to_string());
    }

    if let Some(caps) = BULLET_HEADING.captures(line) {
        return LineKind::BulletHeading(caps[1].trim().to_string());
    }

    if let Some(caps) = NUMBERED_ITEM.captures(line) {
        // Numbers too large to represent are treated as prose.
        if let Ok(number) = caps[1].parse::<u64>() {
            return LineKind::NumberedItem(number, caps[1].to_string(), caps[2].trim().to_string());
        }
    }

    if let Some(caps) = COLON_SUBHEADING.captures(line) {
        return LineKind::ColonSubheading(caps[1].trim().to_string(), caps.get(3).is_some());
    }

    return LineKind::PlainText;
}

struct Reducer {
    parsed: ParsedContent,
    mode: ListMode,
    /// Code collected since the opening fence, `None` outside a code block.
    fence: Option<String>,
    paragraph: String,
}

impl Reducer {
    fn new() -> Reducer {
        return Reducer {
            parsed: ParsedContent::default(),
            mode: ListMode::Prose,
            fence: None,
            paragraph: "".to_string(),
        };
    }

    fn push_line(&mut self, line: &str) {
        let kind = classify(line);

        if let Some(code) = self.fence.as_mut() {
            if kind == LineKind::CodeFence {
                self.close_fence();
            } else {
                code.push_str(line);
                code.push('\n');
            }
            return;
        }

        match kind {
            LineKind::Blank => {
                self.flush_paragraph();
            }
            LineKind::CodeFence => {
                self.fence = Some("".to_string());
            }
            LineKind::Heading(text) => {
                let idx = self.parsed.headings.len();
                self.parsed.headings.push(strip_bold(&text));
                self.parsed.blocks.push(Block::Heading(idx));
                self.write_line(&strip_bold(line));
            }
            LineKind::BulletHeading(text) => {
                let text = strip_bold(&text);
                self.push_subheading(
                    Subheading {
                        text: text.to_string(),
                        has_bullet: true,
                        is_numbered: false,
                        number: None,
                    },
                    format!("• {text}"),
                );
            }
            LineKind::NumberedItem(number, written, text) => {
                self.mode = ListMode::Numbered;
                let text = strip_bold(&text);
                self.push_subheading(
                    Subheading {
                        text: text.to_string(),
                        has_bullet: false,
                        is_numbered: true,
                        number: Some(number),
                    },
                    format!("{written}. {text}"),
                );
            }
            LineKind::ColonSubheading(text, has_bullet) if self.mode == ListMode::Prose => {
                self.push_subheading(
                    Subheading {
                        text: strip_bold(&text),
                        has_bullet,
                        is_numbered: false,
                        number: None,
                    },
                    line.to_string(),
                );
            }
            LineKind::ColonSubheading(..) | LineKind::PlainText => {
                if self.mode == ListMode::Prose {
                    let text = strip_bold(line);
                    self.write_line(&text);
                    self.parsed.blocks.push(Block::Text(text));
                }
            }
        }
    }

    fn push_subheading(&mut self, subheading: Subheading, line: String) {
        let idx = self.parsed.subheadings.len();
        self.parsed.subheadings.push(subheading);
        self.write_line(&line);
        self.parsed.blocks.push(Block::Subheading(idx, line));
    }

    fn close_fence(&mut self) {
        if let Some(code) = self.fence.take() {
            let idx = self.parsed.code_blocks.len();
            self.parsed.code_blocks.push(code.trim().to_string());
            self.write_line(&ParsedContent::code_block_token(idx));
            self.parsed.blocks.push(Block::Code(idx));
        }
    }

    fn write_line(&mut self, line: &str) {
        self.paragraph.push_str(line);
        self.paragraph.push('\n');
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }

        self.parsed.text.push_str(&self.paragraph);
        self.parsed.text.push('\n');
        self.paragraph.clear();
        self.parsed.blocks.push(Block::Break);
    }

    fn finish(mut self) -> ParsedContent {
        // An unterminated fence, such as one still streaming in, keeps its code.
        self.close_fence();
        self.parsed.text.push_str(&self.paragraph);

        return self.parsed;
    }
}

pub struct ContentParser {}

impl ContentParser {
    /// Extracts headings, list items, and code blocks from a message. Code
    /// blocks are replaced in `text` by a `[CODE_BLOCK_n]` line pointing at
    /// `code_blocks[n]`.
    pub fn parse(content: &str) -> ParsedContent {
        let mut reducer = Reducer::new();
        for line in content.split('\n') {
            reducer.push_line(line);
        }

        return reducer.finish();
    }
}
