//! Document layer — metadata, listing, text extraction and term search
//!
//! Turns plain text, PDF and word-processor files into one text
//! representation and searches it on demand.

pub mod error;
pub mod extract;
pub mod schema;
pub mod search;
pub mod storage;

pub use error::DocError;
pub use extract::{Capabilities, Capability, DocumentFormat, DocumentReader};
pub use schema::{FileMetadata, ReadResult, SearchMatch, SearchResult, WriteResult};
pub use search::{search, search_in_file, DEFAULT_CONTEXT_WINDOW};
pub use storage::{list_files, metadata, write_file};
