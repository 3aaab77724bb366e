#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use super::HistoryStore;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::ChatState;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::models::Role;

/// Owns the conversation and drives it through sending, streaming, failure,
/// retry, and clearing. History is written on every transition; streamed
/// fragments are only written once the answer completes.
pub struct ChatSession {
    pub state: ChatState,
    pub model: ModelName,
    history: HistoryStore,
    /// Input of the request currently waiting on the backend.
    in_flight: Option<String>,
    last_failed_input: Option<String>,
    /// Id of the assistant message receiving streamed fragments.
    answer_id: Option<String>,
}

impl ChatSession {
    pub fn new(history: HistoryStore, model: ModelName) -> ChatSession {
        return ChatSession {
            state: ChatState::default(),
            model,
            history,
            in_flight: None,
            last_failed_input: None,
            answer_id: None,
        };
    }

    pub async fn load_history(&mut self) {
        self.state.messages = self.history.load().await;
        tracing::debug!(count = self.state.messages.len(), "Loaded chat history");
    }

    pub fn last_failed_input(&self) -> Option<&str> {
        return self.last_failed_input.as_deref();
    }

    pub fn set_model(&mut self, model: ModelName) {
        self.model = model;
    }

    /// Shows an error that has nothing to retry, such as a clipboard failure.
    pub fn report_error(&mut self, message: &str) {
        self.state.error = Some(message.to_string());
    }

    /// Adds the question and an empty answer to the conversation, returning
    /// the prompt to send. Nothing happens for blank input or while another
    /// answer is still loading.
    pub async fn submit(&mut self, input: &str) -> Option<BackendPrompt> {
        let text = input.trim();
        if text.is_empty() || self.state.is_loading {
            return None;
        }

        self.state.messages.push(Message::new(Role::User, text));
        let prompt = BackendPrompt::new(self.state.messages.clone(), self.model);

        let answer = Message::new(Role::Assistant, "");
        self.answer_id = Some(answer.id.to_string());
        self.state.messages.push(answer);

        self.state.is_loading = true;
        self.state.error = None;
        self.in_flight = Some(text.to_string());
        self.history.save(&self.state.messages).await;

        return Some(prompt);
    }

    pub async fn handle_backend_response(&mut self, res: BackendResponse) {
        if !res.text.is_empty() {
            let answer = self.answer_mut();
            if let Some(message) = answer {
                message.append(&res.text);
            } else {
                tracing::warn!("Dropping fragment without a pending answer");
            }
        }

        if res.done {
            self.state.is_loading = false;
            self.state.error = None;
            self.in_flight = None;
            self.last_failed_input = None;
            self.answer_id = None;
            self.history.save(&self.state.messages).await;
        }
    }

    /// Keeps whatever part of the answer arrived and remembers the input so
    /// it can be retried.
    pub async fn handle_backend_error(&mut self, message: &str) {
        tracing::error!(error = message, "Knowledge base request failed");

        self.state.is_loading = false;
        self.state.error = Some(message.to_string());
        if let Some(input) = self.in_flight.take() {
            self.last_failed_input = Some(input);
        }
        self.answer_id = None;
        self.history.save(&self.state.messages).await;
    }

    pub async fn retry(&mut self) -> Option<BackendPrompt> {
        let input = self.last_failed_input.clone()?;
        return self.submit(&input).await;
    }

    pub async fn clear(&mut self) {
        self.history.clear().await;
        self.state = ChatState::default();
        self.in_flight = None;
        self.last_failed_input = None;
        self.answer_id = None;
    }

    fn answer_mut(&mut self) -> Option<&mut Message> {
        let id = self.answer_id.as_ref()?;
        return self
            .state
            .messages
            .iter_mut()
            .rev()
            .find(|message| return &message.id == id);
    }
}
