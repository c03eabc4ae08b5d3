//! Error types for conversations.

/// Errors that can occur while answering a question.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The question cannot be processed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The language model failed.
    #[error(transparent)]
    Llm(#[from] deepbrain_llm::Error),

    /// Retrieval failed.
    #[error("Search failed: {0}")]
    Search(#[from] deepbrain_core::Error),
}

impl Error {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            Self::Validation(_) | Self::Search(_) => false,
        }
    }
}

/// Result type alias for chat operations.
pub type Result<T> = std::result::Result<T, Error>;
