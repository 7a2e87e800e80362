use crate::docs::DEFAULT_CONTEXT_WINDOW;
use crate::intent::DEFAULT_FOLDER;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime configuration: defaults, then an optional TOML file, then
/// environment overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folders named in queries are resolved against this directory.
    pub workspace_dir: String,
    pub default_folder: String,
    pub search: SearchConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub context_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: ".".into(),
            default_folder: DEFAULT_FOLDER.into(),
            search: SearchConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            base_url: "https://api.openai.com/v1".into(),
            max_tokens: 400,
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load from `path`, or from the per-user config file when `path` is
    /// `None`. Only an explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.is_file() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "docsift")
            .map(|d| d.config_dir().join("config.toml"))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()) {
            self.summarizer.api_key = Some(key);
        }
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.is_empty()) {
            self.summarizer.model = model;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.summarizer.base_url = url;
        }
        if let Some(dir) = lookup("DOCSIFT_WORKSPACE").filter(|v| !v.is_empty()) {
            self.workspace_dir = dir;
        }
    }

    /// `workspace_dir` with a leading `~` expanded.
    pub fn workspace_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.workspace_dir).into_owned())
    }
}
