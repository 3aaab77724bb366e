pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod chat_session;
pub mod clipboard;
mod code_blocks;
mod content_parser;
pub mod events;
mod history;
mod scroll;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use chat_session::*;
pub use code_blocks::*;
pub use content_parser::*;
pub use history::*;
pub use scroll::*;
