//! Error types for remote calls.

use thiserror::Error;

/// Errors that can occur while talking to the entry service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success HTTP status.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code.
        status: u16,
        /// `message` from the error body, when present.
        message: Option<String>,
    },
    /// A success response could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Message supplied by the service, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// The service message verbatim, else the per-call default.
    pub fn message_or(&self, default: &str) -> String {
        self.server_message().unwrap_or(default).to_string()
    }

    /// True for a 404 from the service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
