//! Query orchestration: classify a query, run the matching document
//! operations and assemble one structured outcome.
//!
//! Per-file failures are kept in the outcome; only an unusable folder is an
//! error for the caller.

use crate::config::Config;
use crate::docs::{
    list_files, search_in_file, write_file, DocError, DocumentReader, FileMetadata, ReadResult,
    SearchMatch, DEFAULT_CONTEXT_WINDOW,
};
use crate::intent::{classify_with_folder, Intent, DEFAULT_FOLDER};
use crate::summarize::Summarizer;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

const DEFAULT_SUMMARY_TOKENS: usize = 400;

/// One file of a `read_all` batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileRead {
    pub file: FileMetadata,
    pub read: ReadResult,
}

/// A file with at least one hit for the searched term.
#[derive(Debug, Clone, Serialize)]
pub struct FileMatches {
    pub file: FileMetadata,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QueryOutcome {
    ReadAll {
        folder: String,
        results: Vec<FileRead>,
    },
    FindSkill {
        term: String,
        folder: String,
        matches: Vec<FileMatches>,
    },
    CreateSummary {
        source: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary_path: Option<String>,
        write_ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<DocError>,
    },
    Unknown {
        query: String,
    },
}

pub struct QueryRunner {
    reader: DocumentReader,
    workspace: PathBuf,
    default_folder: String,
    context_window: usize,
    summary_tokens: usize,
}

impl QueryRunner {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            reader: DocumentReader::new(),
            workspace: workspace.into(),
            default_folder: DEFAULT_FOLDER.to_string(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            summary_tokens: DEFAULT_SUMMARY_TOKENS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            reader: DocumentReader::new(),
            workspace: config.workspace_path(),
            default_folder: config.default_folder.clone(),
            context_window: config.search.context_window,
            summary_tokens: config.summarizer.max_tokens,
        }
    }

    pub fn with_reader(mut self, reader: DocumentReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn run(&self, query: &str, summarizer: &dyn Summarizer) -> Result<QueryOutcome> {
        let intent = classify_with_folder(query, &self.default_folder);
        tracing::info!("Classified query as {:?}", intent);
        self.execute(intent, summarizer)
    }

    pub fn execute(&self, intent: Intent, summarizer: &dyn Summarizer) -> Result<QueryOutcome> {
        match intent {
            Intent::ReadAll { folder } => self.read_all(folder),
            Intent::FindSkill { term, folder } => self.find_skill(term, folder),
            Intent::CreateSummary { folder, filename } => {
                self.create_summary(&folder, &filename, summarizer)
            }
            Intent::Unknown { raw_query } => Ok(QueryOutcome::Unknown { query: raw_query }),
        }
    }

    /// Folders must stay inside the workspace: plain relative names only.
    fn resolve(&self, folder: &str) -> Result<PathBuf> {
        let contained = Path::new(folder)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            bail!("Folder '{folder}' is outside the workspace");
        }
        Ok(self.workspace.join(folder))
    }

    fn list(&self, dir: &Path) -> Result<Vec<FileMetadata>> {
        list_files(dir, None)
            .with_context(|| format!("Cannot list folder {}", dir.display()))
    }

    fn read_all(&self, folder: String) -> Result<QueryOutcome> {
        let dir = self.resolve(&folder)?;
        let results: Vec<FileRead> = self
            .list(&dir)?
            .into_iter()
            .map(|file| {
                let read = self.reader.decode(Path::new(&file.absolute_path));
                FileRead { file, read }
            })
            .collect();

        let failed = results.iter().filter(|r| r.read.error.is_some()).count();
        tracing::info!(
            "Read {} files from {} ({} failed)",
            results.len(),
            dir.display(),
            failed
        );
        Ok(QueryOutcome::ReadAll { folder, results })
    }

    fn find_skill(&self, term: String, folder: String) -> Result<QueryOutcome> {
        let dir = self.resolve(&folder)?;
        let mut matches = Vec::new();
        for file in self.list(&dir)? {
            let found = search_in_file(
                &self.reader,
                Path::new(&file.absolute_path),
                &term,
                self.context_window,
            );
            if let Some(e) = &found.error {
                tracing::debug!("Skipping {}: {}", file.name, e);
            }
            if !found.matches.is_empty() {
                matches.push(FileMatches {
                    file,
                    matches: found.matches,
                });
            }
        }

        tracing::info!(
            "{} files in {} mention '{}'",
            matches.len(),
            dir.display(),
            term
        );
        Ok(QueryOutcome::FindSkill {
            term,
            folder,
            matches,
        })
    }

    fn create_summary(
        &self,
        folder: &str,
        filename: &str,
        summarizer: &dyn Summarizer,
    ) -> Result<QueryOutcome> {
        let dir = self.resolve(folder)?;
        let source = dir.join(filename);
        let read = self.reader.decode(&source);

        let content = match (read.content, read.error) {
            (_, Some(error)) => {
                return Ok(QueryOutcome::CreateSummary {
                    source: source.display().to_string(),
                    summary_path: None,
                    write_ok: false,
                    summary: None,
                    error: Some(error),
                });
            }
            (content, None) => content.unwrap_or_default(),
        };

        let summary = summarizer.summarize(&content, self.summary_tokens);
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());
        let written = write_file(&dir.join(format!("summary_{stem}.txt")), &summary);
        tracing::info!(
            "Summary of {} written to {} (ok={})",
            source.display(),
            written.path,
            written.ok
        );

        Ok(QueryOutcome::CreateSummary {
            source: source.display().to_string(),
            summary_path: Some(written.path),
            write_ok: written.ok,
            summary: Some(summary),
            error: written.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn never_called(_: &str, _: usize) -> String {
        panic!("summarizer must not be called")
    }

    #[test]
    fn unknown_query_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let runner = QueryRunner::new(dir.path());

        let query = "what is the weather";
        let outcome = runner.run(query, &never_called).unwrap();
        assert!(matches!(outcome, QueryOutcome::Unknown { query: ref q } if q == query));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_folder_is_a_hard_failure() {
        let dir = TempDir::new().unwrap();
        let runner = QueryRunner::new(dir.path());

        let err = runner
            .run("read all resumes in the nowhere folder", &never_called)
            .unwrap_err();
        assert!(format!("{err:#}").contains("nowhere"));
    }

    #[test]
    fn parent_folder_is_rejected() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("ws");
        fs::create_dir_all(workspace.join("resumes")).unwrap();
        let runner = QueryRunner::new(&workspace);

        for folder in ["..", "resumes/../..", "/tmp"] {
            let query = format!("read all resumes in the {folder} folder");
            let err = runner.run(&query, &never_called).unwrap_err();
            assert!(err.to_string().contains("outside the workspace"), "{folder}");
        }
    }

    #[test]
    fn nested_folder_stays_allowed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("cvs").join("2024")).unwrap();
        fs::write(dir.path().join("cvs").join("2024").join("a.txt"), "Go").unwrap();
        let runner = QueryRunner::new(dir.path());

        let outcome = runner
            .run("read all resumes in the cvs/2024 folder", &never_called)
            .unwrap();
        let QueryOutcome::ReadAll { results, .. } = outcome else {
            panic!("expected read_all");
        };
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn failed_decode_skips_summarizer_and_write() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("resumes")).unwrap();
        let runner = QueryRunner::new(dir.path());

        let outcome = runner
            .run("create a summary file for ghost.txt", &never_called)
            .unwrap();
        match outcome {
            QueryOutcome::CreateSummary {
                write_ok, error, ..
            } => {
                assert!(!write_ok);
                assert!(matches!(error, Some(DocError::NotFound(_))));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!dir.path().join("resumes").join("summary_ghost.txt").exists());
    }

    #[test]
    fn outcome_serializes_with_action_tag() {
        let outcome = QueryOutcome::Unknown {
            query: "hello".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "unknown");
        assert_eq!(json["query"], "hello");
    }
}
