use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure of a single file-level operation.
///
/// These are carried inline in result values (`ReadResult`, `SearchResult`,
/// `WriteResult`) so one bad file never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("{0}")]
    CapabilityUnavailable(String),
    #[error("Failed to decode {path}: {detail}")]
    DecodeFailed { path: String, detail: String },
    #[error("Empty search term")]
    EmptyTerm,
    #[error("Failed to write {path}: {detail}")]
    WriteFailed { path: String, detail: String },
}

impl DocError {
    pub(crate) fn decode(path: impl Into<String>, detail: impl ToString) -> Self {
        Self::DecodeFailed {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

// Errors leave the process as JSON strings, never as opaque codes.
impl Serialize for DocError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = DocError::decode("/tmp/cv.pdf", "bad xref");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Failed to decode /tmp/cv.pdf: bad xref\"");
    }

    #[test]
    fn capability_message_is_verbatim() {
        let err = DocError::CapabilityUnavailable("PDF support not installed".into());
        assert_eq!(err.to_string(), "PDF support not installed");
    }
}
