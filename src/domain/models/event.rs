use tui_textarea::Input;

use super::BackendResponse;

#[derive(Debug)]
pub enum Event {
    BackendPromptResponse(BackendResponse),
    BackendFailed(String),
    ClipboardFailed(String),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLR(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
