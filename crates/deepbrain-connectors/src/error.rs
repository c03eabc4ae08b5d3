//! Error types for connectors.

use thiserror::Error;

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while collecting documents.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error bubbled up from deepbrain-core.
    #[error(transparent)]
    Core(#[from] deepbrain_core::Error),

    /// Invalid connector settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The crawl finished without producing any document.
    #[error("Crawl failed: {0}")]
    Crawl(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status} for {url}")]
    Status {
        /// Status code
        status: u16,
        /// Requested URL
        url: String,
    },
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a crawl error.
    pub fn crawl(message: impl Into<String>) -> Self {
        Error::Crawl(message.into())
    }
}
