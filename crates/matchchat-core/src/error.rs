use thiserror::Error;

/// Failures surfaced by the chat API.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The server answered, but the payload signals non-success.
    #[error("{0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ChatError {
    /// Transport and parse failures, as opposed to an application-level rejection.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ChatError::Rejected(_))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
