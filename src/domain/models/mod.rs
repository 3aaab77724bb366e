mod action;
mod backend;
mod chat_state;
mod error;
mod event;
mod loading;
mod message;
mod parsed_content;
mod prompt_box;
mod slash_commands;

pub use action::*;
pub use backend::*;
pub use chat_state::*;
pub use error::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use parsed_content::*;
pub use prompt_box::*;
pub use slash_commands::*;
