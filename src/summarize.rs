//! Summarizers: a local keyword heuristic and a remote chat-completions model.
//!
//! Summarizers never fail. A remote error comes back as a marked string so
//! the caller always has something to write.

use crate::config::SummarizerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Most characters sent to the remote model.
const MAX_REMOTE_INPUT_CHARS: usize = 8_000;

const KEYWORDS: &[&str] = &[
    "skill",
    "experience",
    "python",
    "java",
    "c++",
    "machine learning",
];

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes resume content.";

const USER_PROMPT: &str = "Summarize the following resume text. \
    Be concise and list top skills and a 2-line summary.";

pub trait Summarizer {
    /// Summarize `text`; `max_length_hint` is advisory (tokens for remote
    /// models).
    fn summarize(&self, text: &str, max_length_hint: usize) -> String;
}

impl<F> Summarizer for F
where
    F: Fn(&str, usize) -> String,
{
    fn summarize(&self, text: &str, max_length_hint: usize) -> String {
        self(text, max_length_hint)
    }
}

/// Offline summary: lines mentioning common skill keywords plus the longest
/// lines of the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSummarizer;

impl Summarizer for HeuristicSummarizer {
    fn summarize(&self, text: &str, _max_length_hint: usize) -> String {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let keyword_lines: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| {
                let lower = l.to_lowercase();
                KEYWORDS.iter().any(|k| lower.contains(k))
            })
            .take(5)
            .collect();

        // Stable sort keeps document order among equally long lines.
        let mut longest = lines.clone();
        longest.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        longest.truncate(3);

        let mut parts = Vec::new();
        if !keyword_lines.is_empty() {
            parts.push(format!(
                "Detected keyword lines: {}",
                keyword_lines.join("; ")
            ));
        }
        parts.push(format!("Top lines: {}", longest.join(" | ")));
        parts.join("\n")
    }
}

/// Summarizes through an OpenAI-compatible `/chat/completions` endpoint.
pub struct RemoteSummarizer {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl RemoteSummarizer {
    pub fn new(api_key: &str, config: &SummarizerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            endpoint: format!("{base_url}/chat/completions"),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }

    fn request(&self, text: &str, max_tokens: usize) -> Result<String> {
        let excerpt: String = text.chars().take(MAX_REMOTE_INPUT_CHARS).collect();
        let prompt = format!("{USER_PROMPT}\n\n{excerpt}");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens,
            temperature: 0.2,
        };

        tracing::info!("Requesting summary from {} ({})", self.endpoint, self.model);
        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Summary request failed")?
            .error_for_status()
            .context("Summary endpoint returned an error")?
            .json()
            .context("Malformed summary response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .context("Summary response had no content")
    }
}

impl Summarizer for RemoteSummarizer {
    fn summarize(&self, text: &str, max_length_hint: usize) -> String {
        match self.request(text, max_length_hint) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Remote summarization failed: {:#}", e);
                format!("[summarization failed: {e:#}]")
            }
        }
    }
}

/// Choose a summarizer. `prefer_remote` selects the remote model when an API
/// key is configured; otherwise the heuristic one is used.
pub fn select(prefer_remote: bool, config: &SummarizerConfig) -> Result<Box<dyn Summarizer>> {
    if !prefer_remote {
        return Ok(Box::new(HeuristicSummarizer));
    }
    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => Ok(Box::new(RemoteSummarizer::new(key, config)?)),
        None => {
            tracing::warn!("No API key set for the remote summarizer; using heuristic summary");
            Ok(Box::new(HeuristicSummarizer))
        }
    }
}
