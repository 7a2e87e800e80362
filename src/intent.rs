//! Free-form query → action.
//!
//! A short ordered table of rules; the first rule that recognises the query
//! wins. New actions are added as new rules, in priority order.

use regex::Regex;
use std::sync::LazyLock;

/// Folder used when a query does not name one.
pub const DEFAULT_FOLDER: &str = "resumes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ReadAll { folder: String },
    FindSkill { term: String, folder: String },
    CreateSummary { folder: String, filename: String },
    Unknown { raw_query: String },
}

struct Rule {
    name: &'static str,
    apply: fn(&str, &str) -> Option<Intent>,
}

const FOLDER_PATTERN: &str = r"(?i)in the ([\w\-/. ]+) folder";
const FIND_PATTERN: &str = r"(?i)find resumes mentioning ([\w+#\- ]+)";
const SUMMARY_PATTERN: &str = r"(?i)create a summary file for ([\w\-. ]+\.[a-z0-9]+)";

static FOLDER_RE: LazyLock<Regex> = LazyLock::new(|| compile(FOLDER_PATTERN));
static FIND_RE: LazyLock<Regex> = LazyLock::new(|| compile(FIND_PATTERN));
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| compile(SUMMARY_PATTERN));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

// Evaluated top to bottom.
static RULES: &[Rule] = &[
    Rule {
        name: "read_all",
        apply: read_all,
    },
    Rule {
        name: "find_skill",
        apply: find_skill,
    },
    Rule {
        name: "create_summary",
        apply: create_summary,
    },
];

/// Classify `query` using [`DEFAULT_FOLDER`] where no folder is named.
pub fn classify(query: &str) -> Intent {
    classify_with_folder(query, DEFAULT_FOLDER)
}

/// Classify `query`, defaulting to `default_folder`.
///
/// Matching ignores case; captured folder, term and filename keep the case
/// they were typed in.
pub fn classify_with_folder(query: &str, default_folder: &str) -> Intent {
    for rule in RULES {
        if let Some(intent) = (rule.apply)(query, default_folder) {
            tracing::debug!("Query matched rule '{}'", rule.name);
            return intent;
        }
    }
    Intent::Unknown {
        raw_query: query.to_string(),
    }
}

fn read_all(query: &str, default_folder: &str) -> Option<Intent> {
    let lowered = query.to_lowercase();
    if !(lowered.contains("read all") && lowered.contains("resume")) {
        return None;
    }
    let folder = FOLDER_RE
        .captures(query)
        .map(|c| c[1].trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| default_folder.to_string());
    Some(Intent::ReadAll { folder })
}

fn find_skill(query: &str, default_folder: &str) -> Option<Intent> {
    let term = FIND_RE.captures(query)?[1].trim().to_string();
    if term.is_empty() {
        return None;
    }
    Some(Intent::FindSkill {
        term,
        folder: default_folder.to_string(),
    })
}

fn create_summary(query: &str, default_folder: &str) -> Option<Intent> {
    let filename = SUMMARY_RE.captures(query)?[1].trim().to_string();
    Some(Intent::CreateSummary {
        folder: default_folder.to_string(),
        filename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_all_with_named_folder() {
        assert_eq!(
            classify("read all resumes in the CVs folder"),
            Intent::ReadAll {
                folder: "CVs".into()
            }
        );
    }

    #[test]
    fn read_all_defaults_folder() {
        assert_eq!(
            classify("Read all resumes"),
            Intent::ReadAll {
                folder: "resumes".into()
            }
        );
        assert_eq!(
            classify_with_folder("read all resumes", "inbox"),
            Intent::ReadAll {
                folder: "inbox".into()
            }
        );
    }

    #[test]
    fn read_all_needs_both_phrases() {
        assert!(matches!(
            classify("read all files in the docs folder"),
            Intent::Unknown { .. }
        ));
    }

    #[test]
    fn find_skill_captures_term() {
        assert_eq!(
            classify("find resumes mentioning python"),
            Intent::FindSkill {
                term: "python".into(),
                folder: "resumes".into()
            }
        );
        assert_eq!(
            classify("Find resumes mentioning C++"),
            Intent::FindSkill {
                term: "C++".into(),
                folder: "resumes".into()
            }
        );
        assert_eq!(
            classify("find resumes mentioning machine learning?"),
            Intent::FindSkill {
                term: "machine learning".into(),
                folder: "resumes".into()
            }
        );
    }

    #[test]
    fn create_summary_requires_extension() {
        assert_eq!(
            classify("Create a summary file for Alice_Smith.pdf"),
            Intent::CreateSummary {
                folder: "resumes".into(),
                filename: "Alice_Smith.pdf".into()
            }
        );
        assert!(matches!(
            classify("create a summary file for alice"),
            Intent::Unknown { .. }
        ));
    }

    #[test]
    fn earlier_rules_win() {
        // Mentions both "read all ... resume" and the find phrase.
        assert!(matches!(
            classify("read all resumes, then find resumes mentioning rust"),
            Intent::ReadAll { .. }
        ));
    }

    #[test]
    fn unrecognised_queries_are_echoed() {
        assert_eq!(
            classify("what is the weather"),
            Intent::Unknown {
                raw_query: "what is the weather".into()
            }
        );
    }
}
