use std::io;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use serde_json::Value;

use crate::domain::models::BackendError;

pub fn convert_err(err: reqwest::Error) -> io::Error {
    let err_msg = err.to_string();
    return io::Error::new(io::ErrorKind::Interrupted, err_msg);
}

pub fn network_error(err: reqwest::Error) -> anyhow::Error {
    return anyhow!(BackendError::Network(err.to_string()));
}

/// Builds the error for a non-success response, preferring the server's
/// `detail` message over the generic status text.
pub async fn status_error(res: reqwest::Response) -> anyhow::Error {
    let status = res.status();
    let mut message = status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string();

    if let Ok(body) = res.json::<Value>().await {
        match body.get("detail") {
            Some(Value::String(detail)) => {
                message = detail.to_string();
            }
            Some(Value::Null) | None => {}
            Some(detail) => {
                message = detail.to_string();
            }
        }
    }

    tracing::error!(status = status.as_u16(), detail = %message, "Request failed");
    return anyhow!(BackendError::HttpStatus {
        status: status.as_u16(),
        message,
    });
}

pub async fn health_check(url: &str, timeout: &str) -> Result<()> {
    let res = reqwest::Client::new()
        .get(format!("{url}/api/health"))
        .timeout(Duration::from_millis(timeout.parse::<u64>()?))
        .send()
        .await;

    let res = match res {
        Ok(res) => res,
        Err(err) => {
            tracing::error!(error = ?err, url = url, "Knowledge base is not reachable");
            return Err(network_error(err));
        }
    };

    if !res.status().is_success() {
        return Err(status_error(res).await);
    }

    return Ok(());
}

pub fn ensure_url(url: &str) -> Result<()> {
    if url.is_empty() {
        bail!("The knowledge base URL is not defined.");
    }

    return Ok(());
}
