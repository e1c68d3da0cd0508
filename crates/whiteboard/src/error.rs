//! Error types for the whiteboard engine
//!
//! Only session persistence can fail at runtime. Capture, redraw and
//! playback operate on the in-memory log and have no error paths.

use std::time::Duration;

use thiserror::Error;

/// Whiteboard error type
#[derive(Debug, Error)]
pub enum WhiteboardError {
    /// Loaded snapshot belongs to a different session
    #[error("snapshot id mismatch: requested {expected}, stored {found}")]
    IdentityMismatch { expected: String, found: String },

    /// Store had nothing for the requested id
    #[error("no snapshot stored for session {0}")]
    SnapshotMissing(String),

    /// Store refused or failed to write the snapshot
    #[error("store rejected snapshot for session {0}")]
    SaveRejected(String),

    /// Snapshot could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Event timestamps go backwards at `index`
    #[error("event log is not time-ordered at index {index}")]
    NonMonotonicLog { index: usize },

    /// An event is stamped after the end of the recording it belongs to
    #[error("event at {time:?} is past the recording length {length:?}")]
    EventPastEnd { time: Duration, length: Duration },
}

impl WhiteboardError {
    /// Short machine-readable code, for hosts that map errors to UI messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdentityMismatch { .. } => "identity_mismatch",
            Self::SnapshotMissing(_) => "snapshot_missing",
            Self::SaveRejected(_) => "save_rejected",
            Self::Serialization(_) => "serialization_error",
            Self::NonMonotonicLog { .. } => "non_monotonic_log",
            Self::EventPastEnd { .. } => "event_past_end",
        }
    }
}

impl From<serde_json::Error> for WhiteboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for whiteboard operations
pub type Result<T> = std::result::Result<T, WhiteboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = WhiteboardError::IdentityMismatch {
            expected: "a".into(),
            found: "b".into(),
        };
        assert_eq!(err.code(), "identity_mismatch");
        assert!(err.to_string().contains("requested a"));
        assert_eq!(WhiteboardError::SnapshotMissing("x".into()).code(), "snapshot_missing");
    }

    #[test]
    fn test_from_serde_error() {
        let result: std::result::Result<i32, serde_json::Error> = serde_json::from_str("nope");
        let err: WhiteboardError = result.unwrap_err().into();
        assert_eq!(err.code(), "serialization_error");
    }
}
