//! docsift — read, search and summarize a folder of documents from one
//! free-form query.

pub mod config;
pub mod docs;
pub mod intent;
pub mod query;
pub mod summarize;

pub use config::Config;
pub use intent::{classify, Intent};
pub use query::{QueryOutcome, QueryRunner};
pub use summarize::{HeuristicSummarizer, RemoteSummarizer, Summarizer};
