use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    /// `message` is the server's own text, absent when the body carried none.
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error body returned by the platform API on non-success responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// Error text sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Timeout => true,
            ClientError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Text shown inline on a page. Server and validation messages are passed
    /// through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Api { status, .. } => format!("Request failed with status {}", status),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Forbidden(msg) => msg.clone(),
            e if e.is_timeout() => "Request timeout. Please try again.".to_string(),
            ClientError::Network(_) => "Server error. Please try again later.".to_string(),
            other => other.to_string(),
        }
    }
}
