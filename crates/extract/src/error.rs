/// A caller-input fault. The message is safe to show to end users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    StatusCode(u16),

    #[error("Url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Cancelled")]
    Cancelled,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Environment faults; retrying may succeed.
    pub fn is_transient(&self) -> bool {
        !self.is_validation()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
