#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Message;

pub const HISTORY_KEY: &str = "thinkscript_chat_history";

/// Chat history kept in a single JSON file. Every operation is best effort:
/// failures are logged and never reach the caller.
pub struct HistoryStore {
    pub dir: path::PathBuf,
}

impl Default for HistoryStore {
    fn default() -> HistoryStore {
        return HistoryStore::new(path::PathBuf::from(Config::get(ConfigKey::HistoryDir)));
    }
}

impl HistoryStore {
    pub fn new(dir: path::PathBuf) -> HistoryStore {
        return HistoryStore { dir };
    }

    pub fn path(&self) -> path::PathBuf {
        return self.dir.join(format!("{HISTORY_KEY}.json"));
    }

    pub async fn load(&self) -> Vec<Message> {
        let file_path = self.path();
        if !file_path.exists() {
            return vec![];
        }

        match self.read(&file_path).await {
            Ok(messages) => return messages,
            Err(err) => {
                tracing::error!(error = ?err, path = ?file_path, "Error loading chat history");
                return vec![];
            }
        }
    }

    pub async fn save(&self, messages: &[Message]) {
        if let Err(err) = self.write(messages).await {
            tracing::error!(error = ?err, path = ?self.path(), "Error saving chat history");
        }
    }

    pub async fn clear(&self) {
        let file_path = self.path();
        if !file_path.exists() {
            return;
        }

        if let Err(err) = fs::remove_file(&file_path).await {
            tracing::error!(error = ?err, path = ?file_path, "Error clearing chat history");
        }
    }

    async fn read(&self, file_path: &path::Path) -> Result<Vec<Message>> {
        let payload = fs::read_to_string(file_path).await?;
        let messages: Vec<Message> = serde_json::from_str(&payload)?;

        return Ok(messages);
    }

    async fn write(&self, messages: &[Message]) -> Result<()> {
        let payload = serde_json::to_string(messages)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let mut file = fs::File::create(self.path()).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;

        return Ok(());
    }
}
