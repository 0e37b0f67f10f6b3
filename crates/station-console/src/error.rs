//! This module contains the error types raised inside the storage and network
//! seams, and the failure classes they are converted into at the boundary.

use std::fmt;

use thiserror::Error;

/// Errors from a durable medium.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage medium poisoned")]
    Poisoned,
}

/// Errors from a single request to a remote collaborator.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("{path} -> {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{path} -> {status}")]
    Status { path: String, status: u16 },
    /// The response body was not valid JSON.
    #[error("{path} -> invalid JSON: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The failure classes a panel can show.
///
/// None of these ever escapes as an error: each is rendered into the status
/// line of the panel that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The local medium could not be read or written; defaults are in use.
    PersistenceUnavailable(String),
    /// The backend could not be reached or refused the request.
    RemoteUnavailable(String),
    /// A precondition for a privileged operation was not met.
    GuardBlocked(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::PersistenceUnavailable(detail) => {
                write!(f, "Local storage unavailable (using defaults): {detail}")
            }
            Failure::RemoteUnavailable(detail) => write!(f, "Backend unavailable: {detail}"),
            Failure::GuardBlocked(reason) => write!(f, "Blocked by guard: {reason}"),
        }
    }
}

impl From<&StoreError> for Failure {
    fn from(err: &StoreError) -> Self {
        Failure::PersistenceUnavailable(err.to_string())
    }
}

impl From<&RemoteError> for Failure {
    fn from(err: &RemoteError) -> Self {
        Failure::RemoteUnavailable(err.to_string())
    }
}
