//! Clap argument types, validation, and config merging.

use clap::Parser;
use std::path::PathBuf;

use redline::config::Config;
use redline::models::ProviderName;

/// AI-generated inline review comments for pull requests.
#[derive(Parser, Debug)]
#[command(name = "redline", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a pull request and post inline comments.
    Review(Box<ReviewArgs>),

    /// Print version information.
    Version,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Pull request number to review (falls back to PR_NUMBER).
    #[arg(long)]
    pub change: Option<u64>,

    /// Repository slug (`owner/name`); defaults to configuration.
    #[arg(long)]
    pub repo: Option<String>,

    /// Directory holding `.redline.toml` (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    // --- Scheduling ---
    /// Maximum inline comments per file.
    #[arg(long)]
    pub file_cap: Option<usize>,

    /// Maximum inline comments for the whole run.
    #[arg(long)]
    pub global_cap: Option<usize>,

    /// Maximum files reviewed concurrently.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    // --- Provider ---
    /// LLM provider: gemini, anthropic, openai, openai-compatible.
    #[arg(long)]
    pub provider: Option<ProviderName>,

    /// Model identifier for the provider.
    #[arg(long)]
    pub model: Option<String>,

    // --- Guidelines ---
    /// Bucket holding review guideline documents.
    #[arg(long)]
    pub guideline_bucket: Option<String>,

    // --- Output ---
    /// Suppress all non-essential output. Only errors are shown.
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

impl ReviewArgs {
    /// Apply CLI flags over an already-layered configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref repo) = self.repo {
            config.host.repo = Some(repo.clone());
        }
        if let Some(file_cap) = self.file_cap {
            config.review.file_cap = file_cap;
        }
        if let Some(global_cap) = self.global_cap {
            config.review.global_cap = global_cap;
        }
        if let Some(max_concurrent) = self.max_concurrent {
            config.review.max_concurrent = max_concurrent;
        }
        if let Some(provider) = self.provider {
            config.provider.name = provider;
        }
        if let Some(ref model) = self.model {
            config.provider.model = model.clone();
        }
        if let Some(ref bucket) = self.guideline_bucket {
            config.guidelines.bucket = Some(bucket.clone());
        }
    }
}
