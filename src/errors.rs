use thiserror::Error;

pub const CONNECTION_ERROR: &str = "Connection error. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// Network failure or a response body that could not be decoded.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Text shown to the user: the server message when there is one, the
    /// fallback otherwise, and a generic connection message for transport
    /// failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => fallback.to_string(),
            Self::Transport(_) => CONNECTION_ERROR.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session file: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be an integer user id or 'none', got {value:?}")]
    InvalidUserId { name: &'static str, value: String },
}
