use anyhow::{Context, Result};
use clap::Parser;
use docsift::{summarize, Config, QueryRunner};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Read, search and summarize documents in a folder.
#[derive(Parser, Debug)]
#[command(name = "docsift", version, about)]
struct Cli {
    /// Free-form query, e.g. "find resumes mentioning python"
    query: String,

    /// Summarize with the remote model (needs OPENAI_API_KEY) instead of the local heuristic
    #[arg(long, alias = "use-llm")]
    remote: bool,

    /// Config file (defaults to the per-user config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that folders named in the query are relative to
    #[arg(long)]
    workspace: Option<PathBuf>,
}

fn main() -> Result<()> {
    // stdout carries the JSON result; logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.workspace {
        config.workspace_dir = dir.to_string_lossy().into_owned();
    }

    let summarizer = summarize::select(cli.remote, &config.summarizer)?;
    let runner = QueryRunner::from_config(&config);
    let outcome = runner.run(&cli.query, &*summarizer)?;

    let json = serde_json::to_string_pretty(&outcome)
        .context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
