use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::run;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::models::Role;
use crate::domain::services::ChatSession;
use crate::domain::services::HistoryStore;

struct ChunkedBackend {}

#[async_trait]
impl Backend for ChunkedBackend {
    fn name(&self) -> BackendName {
        return BackendName::Stream;
    }

    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let count = format!(" ({} messages)", prompt.messages.len());
        for text in ["Use ", "`Average`", count.as_str()] {
            tx.send(Event::BackendPromptResponse(BackendResponse {
                text: text.to_string(),
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

struct DownBackend {}

#[async_trait]
impl Backend for DownBackend {
    fn name(&self) -> BackendName {
        return BackendName::Answer;
    }

    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn get_completion<'a>(
        &self,
        _prompt: BackendPrompt,
        _tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        bail!(BackendError::HttpStatus {
            status: 500,
            message: "Internal Server Error".to_string(),
        });
    }
}

fn session() -> (ChatSession, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let session = ChatSession::new(
        HistoryStore::new(dir.path().to_path_buf()),
        ModelName::Gpt35Turbo,
    );

    return (session, dir);
}

#[tokio::test]
async fn it_streams_the_answer_to_the_writer() -> Result<()> {
    let (mut session, dir) = session();
    let backend: BackendBox = Box::new(ChunkedBackend {});
    let mut out: Vec<u8> = vec![];

    run(backend, &mut session, "How do I average?", &mut out).await?;

    assert_eq!(String::from_utf8(out)?, "Use `Average` (1 messages)\n");

    let saved = HistoryStore::new(dir.path().to_path_buf()).load().await;
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].content, "How do I average?");
    assert_eq!(saved[1].content, "Use `Average` (1 messages)");

    return Ok(());
}

#[tokio::test]
async fn it_continues_the_saved_conversation() -> Result<()> {
    let (mut session, dir) = session();
    HistoryStore::new(dir.path().to_path_buf())
        .save(&[
            Message::new(Role::User, "Hello"),
            Message::new(Role::Assistant, "Hi! Ask me about ThinkScript."),
        ])
        .await;
    let backend: BackendBox = Box::new(ChunkedBackend {});
    let mut out: Vec<u8> = vec![];

    run(backend, &mut session, "And crossovers?", &mut out).await?;

    assert_eq!(String::from_utf8(out)?, "Use `Average` (3 messages)\n");
    assert_eq!(session.state.messages.len(), 4);

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_backend_errors() -> Result<()> {
    let (mut session, dir) = session();
    let backend: BackendBox = Box::new(DownBackend {});
    let mut out: Vec<u8> = vec![];

    let res = run(backend, &mut session, "Anyone there?", &mut out).await;

    assert_eq!(
        res.unwrap_err().to_string(),
        "Request failed with status 500: Internal Server Error"
    );
    assert!(out.is_empty());
    assert_eq!(session.last_failed_input(), Some("Anyone there?"));

    let saved = HistoryStore::new(dir.path().to_path_buf()).load().await;
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].content, "");

    return Ok(());
}

#[tokio::test]
async fn it_rejects_blank_questions() {
    let (mut session, _dir) = session();
    let backend: BackendBox = Box::new(ChunkedBackend {});
    let mut out: Vec<u8> = vec![];

    let res = run(backend, &mut session, "   ", &mut out).await;

    assert!(res.unwrap_err().to_string().starts_with("Nothing to ask."));
    assert!(session.state.messages.is_empty());
}
