//! Shared error types for TreeSync.

use thiserror::Error;

/// Top-level error type for TreeSync operations.
#[derive(Debug, Error)]
pub enum TreeSyncError {
    /// An anchor person id is not present in its tree.
    #[error("anchor person {id} not found in {side} tree")]
    AnchorMissing { side: &'static str, id: String },

    /// GEDCOM parsing error.
    #[error("GEDCOM error: {0}")]
    Gedcom(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_missing_display() {
        let err = TreeSyncError::AnchorMissing {
            side: "source",
            id: "I42".to_string(),
        };
        assert_eq!(err.to_string(), "anchor person I42 not found in source tree");
    }

    #[test]
    fn test_gedcom_error_display() {
        let err = TreeSyncError::Gedcom("unexpected TRLR".to_string());
        assert_eq!(err.to_string(), "GEDCOM error: unexpected TRLR");
    }
}
