use anyhow::bail;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;

static SENDER: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::new();

pub struct ClipboardService {}

impl ClipboardService {
    /// Owns the system clipboard for the lifetime of the app. On X11 copied
    /// text disappears once its owner is dropped.
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        if SENDER.set(tx).is_err() {
            bail!("Clipboard service is already running.");
        }
        let mut clipboard = arboard::Clipboard::new()?;

        while let Some(text) = rx.recv().await {
            if let Err(err) = clipboard.set_text(text) {
                tracing::error!(error = ?err, "Failed to write to the clipboard");
            }
        }

        return Ok(());
    }

    pub fn healthcheck() -> Result<()> {
        if SENDER.get().is_some() {
            return Ok(());
        }

        arboard::Clipboard::new()?;
        return Ok(());
    }

    pub fn set(text: String) -> Result<()> {
        if let Some(tx) = SENDER.get() {
            if tx.send(text).is_err() {
                bail!("The clipboard is no longer available.");
            }
            return Ok(());
        }

        bail!("The clipboard is not available in this terminal.");
    }
}
