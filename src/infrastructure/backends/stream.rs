#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use super::http;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::ModelName;
use crate::domain::models::RequestMessage;

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CompletionRequest {
    messages: Vec<RequestMessage>,
    model: ModelName,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
struct StreamFrame {
    content: Option<String>,
    error: Option<String>,
}

/// Sends every `data:` payload as a partial answer, in the order received.
/// Ends when the reader is exhausted or the server sends `[DONE]`.
pub async fn forward_lines<R>(reader: R, tx: &mpsc::UnboundedSender<Event>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => bail!(BackendError::Network(err.to_string())),
        };

        // Comments, `event:` lines and blank separators carry no answer text.
        let data = match line.trim().strip_prefix("data:") {
            Some(data) => data.trim(),
            None => continue,
        };
        if data.is_empty() {
            continue;
        }
        if data == DONE_MARKER {
            break;
        }

        let frame = match serde_json::from_str::<StreamFrame>(data) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(error = ?err, data = data, "Malformed stream frame");
                bail!(BackendError::Deserialization(err.to_string()));
            }
        };

        if let Some(error) = frame.error {
            bail!(BackendError::Stream(error));
        }

        if let Some(text) = frame.content {
            if !text.is_empty() {
                tx.send(Event::BackendPromptResponse(BackendResponse {
                    text,
                    done: false,
                }))?;
            }
        }
    }

    return Ok(());
}

/// Knowledge base client for `POST /chat`, which answers with a stream of
/// server-sent events.
pub struct StreamChat {
    url: String,
    timeout: String,
}

impl Default for StreamChat {
    fn default() -> StreamChat {
        return StreamChat {
            url: Config::get(ConfigKey::ApiURL),
            timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

#[async_trait]
impl Backend for StreamChat {
    fn name(&self) -> BackendName {
        return BackendName::Stream;
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
        let req = CompletionRequest {
            messages: prompt.request_messages(),
            model: prompt.model,
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/chat", url = self.url))
            .json(&req)
            .send()
            .await
            .map_err(http::network_error)?;

        if !res.status().is_success() {
            return Err(http::status_error(res).await);
        }

        let stream = res.bytes_stream().map_err(http::convert_err);
        forward_lines(StreamReader::new(stream), tx).await?;

        tx.send(Event::BackendPromptResponse(BackendResponse {
            text: "".to_string(),
            done: true,
        }))?;

        return Ok(());
    }
}
