//! Leader Election Error Hierarchy
//!
//! Errors are split by where they originate: configuration, the external
//! lock service, and the election engine itself. Only `step_down` and the
//! configuration loaders hand errors back to callers; the polling loop and
//! the leadership predicate absorb them.

use std::time::Duration;

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failures reported by the external lock service
    #[error(transparent)]
    LockService(#[from] LockServiceError),

    /// Election protocol failures
    #[error(transparent)]
    Election(#[from] ElectionError),
}

#[derive(Debug, thiserror::Error)]
pub enum LockServiceError {
    /// Service endpoint unavailable
    #[error("Lock service unavailable: {0}")]
    Unavailable(String),

    /// The session is unknown to the service or has been invalidated
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Call did not complete within the adaptor's own deadline
    #[error("Lock service call timed out after {0:?}")]
    Timeout(Duration),

    /// Transport level failure with source context
    #[error("Lock service transport error: {source}")]
    Transport {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ElectionError {
    /// The service answered the release call but did not clear the entry
    #[error("Release of {key} with session {session} was rejected")]
    ReleaseRejected { key: String, session: String },

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),
}
