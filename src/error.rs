//! Error types for sessionfile.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A fresh session's generated id collided with an existing file.
    #[error("session already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// The backing file could not be opened or reopened.
    #[error("failed to open session file {}: {source}", path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identifier is not a valid session id.
    #[error("invalid session id: {0:?}")]
    InvalidId(String),

    /// The backing file holds content that cannot be decoded.
    #[error("session data corrupted in {}: {reason}", path.display())]
    DataCorrupted { path: PathBuf, reason: String },

    /// Writing the entries back to the backing file failed.
    #[error("failed to flush session file {}: {source}", path.display())]
    FlushFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid lifecycle transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: crate::session::SessionState,
        to: crate::session::SessionState,
    },

    /// The shared id generator lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// The requested key is not present in the session.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// I/O error outside the session file lifecycle.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_already_exists_display() {
        let err = SessionError::AlreadyExists {
            path: PathBuf::from("/tmp/Ab3dE5gH9k"),
        };
        assert!(err.to_string().contains("Ab3dE5gH9k"));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_invalid_id_display() {
        let err = SessionError::InvalidId("bad id!".into());
        assert!(err.to_string().contains("invalid session id"));
        assert!(err.to_string().contains("bad id!"));
    }

    #[test]
    fn test_file_open_failure_keeps_source() {
        let err = SessionError::FileOpenFailure {
            path: PathBuf::from("missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(err.to_string().contains("failed to open"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("file not found"));
    }

    #[test]
    fn test_flush_failure_display() {
        let err = SessionError::FlushFailure {
            path: PathBuf::from("abcde12345"),
            source: std::io::Error::other("handle closed"),
        };
        assert!(err.to_string().contains("failed to flush"));
        assert!(err.to_string().contains("handle closed"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SessionError = io_err.into();
        assert!(matches!(err, SessionError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_data_corrupted_display() {
        let err = SessionError::DataCorrupted {
            path: PathBuf::from("abcde12345"),
            reason: "invalid utf-8".into(),
        };
        assert!(err.to_string().contains("corrupted"));
        assert!(err.to_string().contains("invalid utf-8"));
    }
}
