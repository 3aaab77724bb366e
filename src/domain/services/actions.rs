#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /retry (/r) - Resends the last question that failed.
- /clear - Deletes the conversation and the saved history.
- /model (/m) [MODEL_NAME] - Switches models. Available: gpt-3.5-turbo, gpt-4-turbo-preview.
- /copy (/c) [CODE_BLOCK_NUMBER?] - Copies code blocks to your clipboard. Each block is labelled with its (NUMBER).
- /quit /exit (/q) - Exit.
- /help (/h) - Provides this help menu.

The CODE_BLOCK_NUMBER can be `1`, a list such as `1,3`, an inclusive range such as `2..4`, or left out to copy the latest block.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+R - Retry the last failed question.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

pub struct ActionsService {}

impl ActionsService {
    /// Streams a single answer. A failure is reported back to the UI as an
    /// event rather than stopping the service.
    pub async fn complete(
        backend: &BackendBox,
        prompt: BackendPrompt,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        tracing::debug!(
            backend = %backend.name(),
            model = %prompt.model,
            messages = prompt.messages.len(),
            "Requesting completion"
        );

        if let Err(err) = backend.get_completion(prompt, tx).await {
            tracing::error!(backend = %backend.name(), error = ?err, "Completion failed");
            tx.send(Event::BackendFailed(err.to_string()))?;
        }

        return Ok(());
    }

    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        while let Some(action) = rx.recv().await {
            match action {
                Action::BackendRequest(prompt) => {
                    let worker_backend = Arc::clone(&backend);
                    let worker_tx = tx.clone();
                    tokio::spawn(async move {
                        return ActionsService::complete(&worker_backend, prompt, &worker_tx).await;
                    });
                }
                Action::CopyToClipboard(text) => {
                    if let Err(err) = ClipboardService::set(text) {
                        tracing::warn!(error = ?err, "Copy failed");
                        tx.send(Event::ClipboardFailed(err.to_string()))?;
                    }
                }
            }
        }

        return Ok(());
    }
}
