use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Unable to reach the knowledge base: {0}")]
    Network(String),
    #[error("Request failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("{0}")]
    Stream(String),
    #[error("Unable to read the knowledge base response: {0}")]
    Deserialization(String),
}
