//! Error types for guestsync.

use std::fmt;

use thiserror::Error;

/// Errors that can end or degrade a sync run.
///
/// `Config` and `Auth` abort the run before any calendar call is made.
/// `Fetch` and `RemoteUpdate` are caught where they happen and folded into
/// the run summary.
#[derive(Error, Debug)]
pub enum GuestSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Failed to fetch events: {0}")]
    Fetch(RemoteError),

    #[error("Failed to update event: {0}")]
    RemoteUpdate(RemoteError),
}

/// Result type alias for guestsync operations.
pub type GuestSyncResult<T> = Result<T, GuestSyncError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    NotFound,
    Conflict,
    PermissionDenied,
    Transport,
    Other,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RemoteErrorKind::NotFound => "not found",
            RemoteErrorKind::Conflict => "conflict",
            RemoteErrorKind::PermissionDenied => "permission denied",
            RemoteErrorKind::Transport => "transport error",
            RemoteErrorKind::Other => "remote error",
        };
        f.write_str(label)
    }
}

/// A failed call against the calendar service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        RemoteError {
            kind,
            message: message.into(),
        }
    }

    /// Classify an HTTP status returned by the calendar API.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            404 | 410 => RemoteErrorKind::NotFound,
            409 | 412 => RemoteErrorKind::Conflict,
            401 | 403 => RemoteErrorKind::PermissionDenied,
            _ => RemoteErrorKind::Other,
        };
        RemoteError::new(kind, message)
    }

    /// The calendar identity could not be resolved or read.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self.kind,
            RemoteErrorKind::NotFound | RemoteErrorKind::PermissionDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_common_api_failures() {
        assert_eq!(RemoteError::from_status(404, "x").kind, RemoteErrorKind::NotFound);
        assert_eq!(RemoteError::from_status(410, "x").kind, RemoteErrorKind::NotFound);
        assert_eq!(RemoteError::from_status(409, "x").kind, RemoteErrorKind::Conflict);
        assert_eq!(RemoteError::from_status(412, "x").kind, RemoteErrorKind::Conflict);
        assert_eq!(
            RemoteError::from_status(403, "x").kind,
            RemoteErrorKind::PermissionDenied
        );
        assert_eq!(RemoteError::from_status(500, "x").kind, RemoteErrorKind::Other);
    }

    #[test]
    fn test_access_errors() {
        assert!(RemoteError::from_status(404, "no such calendar").is_access_error());
        assert!(RemoteError::from_status(401, "bad token").is_access_error());
        assert!(!RemoteError::new(RemoteErrorKind::Transport, "reset").is_access_error());
    }

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = GuestSyncError::RemoteUpdate(RemoteError::from_status(409, "etag mismatch"));
        assert_eq!(err.to_string(), "Failed to update event: conflict: etag mismatch");
    }
}
