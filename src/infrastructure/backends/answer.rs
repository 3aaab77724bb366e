#[cfg(test)]
#[path = "answer_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::sync::mpsc;

use super::http;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Answer;
use crate::domain::models::Backend;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::ModelName;
use crate::domain::models::RequestMessage;
use crate::domain::models::Source;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ChatRequest {
    messages: Vec<RequestMessage>,
    model: ModelName,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
struct SourceResponse {
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
struct ChatResponse {
    content: String,
    #[serde(default)]
    sources: Vec<SourceResponse>,
}

impl From<ChatResponse> for Answer {
    fn from(res: ChatResponse) -> Answer {
        return Answer {
            answer: res.content,
            sources: res
                .sources
                .into_iter()
                .map(|source| {
                    return Source {
                        title: source.name,
                        content: source.content,
                        url: source.url.unwrap_or_default(),
                    };
                })
                .collect(),
        };
    }
}

/// Knowledge base client for `POST /api/chat`, which returns the whole answer
/// and its cited sources in one response.
pub struct AnswerChat {
    url: String,
    timeout: String,
}

impl Default for AnswerChat {
    fn default() -> AnswerChat {
        return AnswerChat {
            url: Config::get(ConfigKey::ApiURL),
            timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

impl AnswerChat {
    pub async fn get_answer(&self, prompt: BackendPrompt) -> Result<Answer> {
        let req = ChatRequest {
            messages: prompt.request_messages(),
            model: prompt.model,
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/api/chat", url = self.url))
            .json(&req)
            .send()
            .await
            .map_err(http::network_error)?;

        if !res.status().is_success() {
            return Err(http::status_error(res).await);
        }

        let body = res.text().await.map_err(http::network_error)?;
        let chat_res = match serde_json::from_str::<ChatResponse>(&body) {
            Ok(chat_res) => chat_res,
            Err(err) => {
                tracing::error!(error = ?err, "Malformed answer response");
                bail!(BackendError::Deserialization(err.to_string()));
            }
        };
        tracing::debug!(sources = chat_res.sources.len(), "Answer response");

        return Ok(Answer::from(chat_res));
    }
}

#[async_trait]
impl Backend for AnswerChat {
    fn name(&self) -> BackendName {
        return BackendName::Answer;
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        http::ensure_url(&self.url)?;
        return http::health_check(&self.url, &self.timeout).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let answer = self.get_answer(prompt).await?;
        let sources = answer.sources_text();

        for text in [answer.answer, sources] {
            if text.is_empty() {
                continue;
            }

            tx.send(Event::BackendPromptResponse(BackendResponse {
                text,
                done: false,
            }))?;
        }

        tx.send(Event::BackendPromptResponse(BackendResponse {
            text: "".to_string(),
            done: true,
        }))?;

        return Ok(());
    }
}
