//! Error types for deepbrain-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for deepbrain-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the DeepBrain crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Plain I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O failure tied to a specific file or directory.
    #[error("I/O error at {}: {source}", path.display())]
    IoWithPath {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content that could not be parsed (JSON, TOML, HTML...).
    #[error("Parse error: {0}")]
    Parse(String),

    /// A named resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Identifier that was looked up.
        id: String,
        /// Kind of resource ("content directory", "index"...).
        kind: String,
    },

    /// An operation failed for a reason not covered above.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a generic operation error.
    pub fn operation(message: impl Into<String>) -> Self {
        Error::Operation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::NotFound {
            id: id.into(),
            kind: kind.into(),
        }
    }

    /// Wraps an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("missing api key");
        assert_eq!(err.to_string(), "Configuration error: missing api key");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("/tmp/index", "index");
        assert_eq!(err.to_string(), "index not found: /tmp/index");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(io, "/etc/deepbrain/config.toml");
        let msg = err.to_string();
        assert!(msg.contains("/etc/deepbrain/config.toml"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::other("disk full");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
