#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use super::Event;
use super::Message;
use super::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    /// Server-sent events from `/chat`, one fragment per `data:` line.
    Stream,
    /// A single `/api/chat` exchange returning the whole answer with sources.
    Answer,
}

impl BackendName {
    pub fn parse(text: &str) -> Option<BackendName> {
        return BackendName::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    Serialize,
    Deserialize,
)]
pub enum ModelName {
    #[default]
    #[strum(serialize = "gpt-3.5-turbo")]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[strum(serialize = "gpt-4-turbo-preview")]
    #[serde(rename = "gpt-4-turbo-preview")]
    Gpt4TurboPreview,
}

impl ModelName {
    pub fn parse(text: &str) -> Option<ModelName> {
        return ModelName::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPrompt {
    pub messages: Vec<Message>,
    pub model: ModelName,
}

impl BackendPrompt {
    pub fn new(messages: Vec<Message>, model: ModelName) -> BackendPrompt {
        return BackendPrompt { messages, model };
    }

    /// The conversation as sent over the wire. Assistant answers that never
    /// received any content, such as ones from failed requests, are skipped.
    pub fn request_messages(&self) -> Vec<RequestMessage> {
        return self
            .messages
            .iter()
            .filter(|message| {
                return message.role == Role::User || !message.content.is_empty();
            })
            .map(|message| {
                return RequestMessage {
                    role: message.role,
                    content: message.content.to_string(),
                };
            })
            .collect();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendResponse {
    pub text: String,
    pub done: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

impl Answer {
    /// Formats cited sources as a list appended below the answer. Empty when
    /// nothing was cited.
    pub fn sources_text(&self) -> String {
        if self.sources.is_empty() {
            return "".to_string();
        }

        let sources = self
            .sources
            .iter()
            .map(|source| {
                if source.url.is_empty() {
                    return format!("- {}", source.title);
                }
                return format!("- {}: {}", source.title, source.url);
            })
            .collect::<Vec<String>>()
            .join("\n");

        return format!("\n\nSources:\n{sources}");
    }
}

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// Used at startup to verify the knowledge base is reachable.
    async fn health_check(&self) -> Result<()>;

    /// Requests an answer for the conversation in `prompt`. Partial answers
    /// are sent through the channel as they arrive, followed by a final
    /// response with `done` set. Failures are returned after any fragments
    /// that were already delivered.
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
