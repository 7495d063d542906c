//! Error types surfaced by queue-service implementations.
//!
//! # Design
//! - Every failure crossing the facade carries a coarse `RemoteErrorKind` so
//!   callers can phrase guidance without parsing transport messages.
//! - The message keeps the server's own wording for display.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Coarse classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// The service could not be reached or the connection dropped.
    Connection,
    /// The namespace, queue, or message does not exist.
    NotFound,
    /// The resource already exists or the lock is held elsewhere.
    Conflict,
    /// The service rejected the request payload.
    Validation,
    /// The service is reachable but temporarily unable to serve.
    Unavailable,
    /// The response could not be understood.
    Protocol,
}

impl RemoteErrorKind {
    /// Short lowercase label used in user-facing messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection error",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Validation => "invalid request",
            Self::Unavailable => "service unavailable",
            Self::Protocol => "protocol error",
        }
    }
}

impl Display for RemoteErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Classified failure returned by a [`crate::QueueService`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    /// Failure classification.
    pub kind: RemoteErrorKind,
    /// Human-readable detail reported by the service or transport.
    pub message: String,
}

impl RemoteError {
    /// Build an error of the given kind.
    #[must_use]
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for [`RemoteErrorKind::Connection`].
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Connection, message)
    }

    /// Shorthand for [`RemoteErrorKind::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NotFound, message)
    }

    /// Shorthand for [`RemoteErrorKind::Conflict`].
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Conflict, message)
    }

    /// Shorthand for [`RemoteErrorKind::Protocol`].
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Protocol, message)
    }
}

/// Convenience alias for facade results.
pub type RemoteResult<T> = Result<T, RemoteError>;
