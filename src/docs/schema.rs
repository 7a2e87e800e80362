use super::error::DocError;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Snapshot of a file's filesystem metadata, taken when it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(rename = "path")]
    pub absolute_path: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "modified")]
    pub modified_at: DateTime<Local>,
}

/// Outcome of decoding one file.
///
/// With metadata present, exactly one of `content` / `error` is set.
/// A missing path yields no metadata and a `NotFound` error.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub content: Option<String>,
    pub metadata: Option<FileMetadata>,
    pub error: Option<DocError>,
}

impl ReadResult {
    pub fn ok(content: String, metadata: FileMetadata) -> Self {
        Self {
            content: Some(content),
            metadata: Some(metadata),
            error: None,
        }
    }

    pub fn failed(error: DocError, metadata: Option<FileMetadata>) -> Self {
        Self {
            content: None,
            metadata,
            error: Some(error),
        }
    }
}

/// One occurrence of a search term. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "match")]
    pub matched_text: String,
    pub context: String,
}

/// Matches of a term within one file, in document order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub matches: Vec<SearchMatch>,
    pub metadata: Option<FileMetadata>,
    pub error: Option<DocError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    pub ok: bool,
    pub path: String,
    pub error: Option<DocError>,
}
