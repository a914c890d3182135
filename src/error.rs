use thiserror::Error;

/// Errors raised while talking to the backend or touching local files.
///
/// Messages never include the session cookie.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The session is missing or expired (HTTP 401).
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A background task panicked or was cancelled before reporting.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClientError {
    /// Build the error for a non-success response, preferring the backend's
    /// own `error` text.
    pub fn from_status(status: u16, backend_message: Option<String>) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            _ => ClientError::Status {
                status,
                message: backend_message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
