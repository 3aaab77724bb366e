use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Subheading {
    pub text: String,
    pub has_bullet: bool,
    pub is_numbered: bool,
    pub number: Option<u64>,
}

/// A single renderable piece of a parsed message. Structural variants point
/// into the matching list of `ParsedContent` by index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Block {
    Heading(usize),
    /// Index into `subheadings`, and the line as it was written to `text`.
    Subheading(usize, String),
    Code(usize),
    Text(String),
    Break,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    pub text: String,
    pub headings: Vec<String>,
    pub subheadings: Vec<Subheading>,
    pub code_blocks: Vec<String>,
    pub blocks: Vec<Block>,
}

impl ParsedContent {
    pub fn code_block_token(idx: usize) -> String {
        return format!("[CODE_BLOCK_{idx}]");
    }
}
