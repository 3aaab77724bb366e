#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::ChatSession;
use super::CodeBlocks;
use super::Scroll;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendResponse;
use crate::domain::models::ModelName;
use crate::domain::models::SlashCommand;

pub struct AppState {
    pub bubble_list: BubbleList,
    pub codeblocks: CodeBlocks,
    pub last_known_height: u16,
    pub last_known_width: u16,
    /// Informational text shown above the prompt, such as help output.
    pub notice: Option<String>,
    pub scroll: Scroll,
    pub session: ChatSession,
}

impl AppState {
    pub fn new(session: ChatSession) -> AppState {
        return AppState {
            bubble_list: BubbleList::new(),
            codeblocks: CodeBlocks::default(),
            last_known_height: 0,
            last_known_width: 0,
            notice: None,
            scroll: Scroll::default(),
            session,
        };
    }

    /// Restores the saved conversation and checks the knowledge base can be
    /// reached before the first question.
    pub async fn init(&mut self, backend: &BackendBox) {
        self.session.load_history().await;
        self.codeblocks
            .replace_from_messages(&self.session.state.messages);

        if let Err(err) = backend.health_check().await {
            tracing::warn!(backend = %backend.name(), error = ?err, "Health check failed");
            self.session.report_error(&format!(
                "The ThinkScript knowledge base at {} isn't responding. Questions will fail until it is running.\n\nError: {err}",
                Config::get(ConfigKey::ApiURL)
            ));
        }

        self.sync_dependants();
        self.scroll.last();
    }

    pub fn is_loading(&self) -> bool {
        return self.session.state.is_loading;
    }

    pub fn error(&self) -> Option<&str> {
        return self.session.state.error.as_deref();
    }

    pub fn can_retry(&self) -> bool {
        return self.session.last_failed_input().is_some();
    }

    /// Returns `(should_break, handled)`. Input that isn't a slash command is
    /// left for the caller to submit.
    pub async fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        self.notice = None;

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_retry() {
            self.retry(tx).await?;
        } else if command.is_clear() {
            self.session.clear().await;
            self.codeblocks.replace_from_messages(&[]);
            self.notice = Some("Conversation cleared.".to_string());
        } else if command.is_model_set() {
            self.set_model(&command);
        } else if command.is_copy_code_block() {
            match self.codeblocks.blocks_from_slash_commands(&command) {
                Ok(text) => {
                    tx.send(Action::CopyToClipboard(text))?;
                    self.notice = Some("Copied to clipboard.".to_string());
                }
                Err(err) => {
                    self.session.report_error(&err.to_string());
                }
            }
        } else if command.is_help() {
            self.notice = Some(help_text());
        }

        self.sync_dependants();
        return Ok((false, true));
    }

    fn set_model(&mut self, command: &SlashCommand) {
        let available = ModelName::iter()
            .map(|model| return model.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        let name = command.args.first().map_or("", |arg| return arg.as_str());
        if name.is_empty() {
            self.notice = Some(format!(
                "Using {}. Available models: {available}",
                self.session.model
            ));
            return;
        }

        if let Some(model) = ModelName::parse(name) {
            self.session.set_model(model);
            Config::set(ConfigKey::Model, &model.to_string());
            self.notice = Some(format!("Switched to {model}."));
            return;
        }

        self.session.report_error(&format!(
            "No model named {name}. Available models: {available}"
        ));
    }

    pub async fn submit(&mut self, input: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if let Some(prompt) = self.session.submit(input).await {
            self.notice = None;
            tx.send(Action::BackendRequest(prompt))?;
        }

        self.sync_dependants();
        self.scroll.last();
        return Ok(());
    }

    pub async fn retry(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if let Some(prompt) = self.session.retry().await {
            self.notice = None;
            tx.send(Action::BackendRequest(prompt))?;
        }

        self.sync_dependants();
        self.scroll.last();
        return Ok(());
    }

    pub async fn handle_backend_response(&mut self, res: BackendResponse) {
        let done = res.done;
        self.session.handle_backend_response(res).await;
        if done {
            self.codeblocks
                .replace_from_messages(&self.session.state.messages);
        }

        self.sync_dependants();
    }

    pub async fn handle_backend_failed(&mut self, message: &str) {
        self.session.handle_backend_error(message).await;
        self.codeblocks
            .replace_from_messages(&self.session.state.messages);
        self.sync_dependants();
    }

    pub fn handle_clipboard_failed(&mut self, message: &str) {
        self.notice = None;
        self.session.report_error(message);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.session.state.messages, self.last_known_width as usize);

        let list_length = u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(list_length, self.last_known_height);
    }
}
