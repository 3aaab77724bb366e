#[cfg(test)]
#[path = "ask_test.rs"]
mod tests;

use std::io;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::ModelName;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::ChatSession;
use crate::domain::services::HistoryStore;
use crate::infrastructure::backends::BackendManager;

/// Asks one question against the saved conversation, writing the answer to
/// `out` as it streams in. A failed request is saved like in the chat UI and
/// returned as an error.
pub async fn run<W: io::Write>(
    backend: BackendBox,
    session: &mut ChatSession,
    question: &str,
    out: &mut W,
) -> Result<()> {
    session.load_history().await;

    let prompt = match session.submit(question).await {
        Some(prompt) => prompt,
        None => {
            bail!("Nothing to ask. Pass a question, such as: thinkscript-chat ask \"How do I plot a moving average?\"");
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let worker = tokio::spawn(async move {
        return ActionsService::complete(&backend, prompt, &tx).await;
    });

    while let Some(event) = rx.recv().await {
        match event {
            Event::BackendPromptResponse(res) => {
                out.write_all(res.text.as_bytes())?;
                out.flush()?;

                let done = res.done;
                session.handle_backend_response(res).await;
                if done {
                    writeln!(out)?;
                    break;
                }
            }
            Event::BackendFailed(message) => {
                session.handle_backend_error(&message).await;
                bail!(message);
            }
            event => {
                tracing::debug!(event = ?event, "Ignoring event while asking");
            }
        }
    }

    worker.await??;

    return Ok(());
}

pub async fn start(question: &str) -> Result<()> {
    let backend = BackendManager::get(&Config::get(ConfigKey::Backend))?;
    let model = ModelName::parse(&Config::get(ConfigKey::Model)).unwrap_or_default();
    let mut session = ChatSession::new(HistoryStore::default(), model);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    return run(backend, &mut session, question, &mut stdout).await;
}
