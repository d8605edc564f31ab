//! redline — AI-generated inline review comments for pull requests.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use redline::config::Config;
use redline::constants;
use redline::env::Env;
use redline::guidelines::{self, GcsGuidelineStore};
use redline::host::GithubHost;
use redline::models::ChangeRef;
use redline::pipeline::ReviewPipeline;
use redline::providers::RigGenerator;
use redline::report;

use cli::args::{Cli, Command, ReviewArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Review(args) => run_review(*args).await,
        Command::Version => run_version(),
    }
}

/// Print version information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        env!("CARGO_PKG_VERSION").green().bold()
    );
    Ok(())
}

/// Review one pull request end to end.
async fn run_review(args: ReviewArgs) -> Result<()> {
    let env = Env::real();
    let mut config =
        Config::load(Some(&args.path), &env).context("failed to load configuration")?;
    args.apply_to(&mut config);

    let number = args.change.or_else(|| {
        env.var(constants::ENV_CHANGE_NUMBER)
            .ok()
            .and_then(|v| v.parse().ok())
    });
    let Some(number) = number else {
        bail!(
            "no pull request number: pass --change or set {}",
            constants::ENV_CHANGE_NUMBER
        );
    };
    let Some(repo) = config.host.repo.clone() else {
        bail!(
            "no repository: pass --repo, set {}, or configure [host] repo",
            constants::ENV_REPOSITORY
        );
    };
    let Some(token) = config.host.token.clone() else {
        bail!("no host token: set {}", constants::ENV_HOST_TOKEN);
    };
    let change = ChangeRef::new(repo, number);

    let host = Arc::new(
        GithubHost::new(config.host.base_api.clone(), token)
            .context("failed to create host client")?,
    );
    let generator = Arc::new(
        RigGenerator::new(config.provider.clone())
            .context("failed to create review generator")?,
    );

    // Guidelines are best-effort: a missing bucket or failed fetch
    // must never block the review.
    let (guidelines_text, history_text) = match config.guidelines.bucket {
        Some(ref bucket) => {
            let store = GcsGuidelineStore::new(bucket.clone())
                .context("failed to create guideline store")?;
            let guidelines_text =
                guidelines::fetch_or_empty(&store, &config.guidelines.prefix).await;
            let history_text = match config.guidelines.history_prefix {
                Some(ref prefix) => guidelines::fetch_or_empty(&store, prefix).await,
                None => String::new(),
            };
            (guidelines_text, history_text)
        }
        None => (String::new(), String::new()),
    };
    if guidelines_text.is_empty() && !args.quiet {
        eprintln!("Warning: no review guidelines loaded.");
    }

    let pipeline = ReviewPipeline::new(host.clone(), generator, host, &config);
    let summary = pipeline
        .run(&change, &guidelines_text, &history_text)
        .await
        .with_context(|| format!("review of {change} failed"))?;

    if !args.quiet {
        print!("{}", report::render(&summary));
    }

    Ok(())
}
