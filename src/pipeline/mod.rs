//! Review pipeline: fetch diffs, generate feedback, place comments.
//!
//! Files are processed with bounded parallelism; the only state shared
//! between them is the scheduler's session counters. A failure in one
//! file never prevents processing of the next.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::constants::MAX_DIFF_CHARS;
use crate::diff::{parse_file_patch, LineIndex, PatchError};
use crate::host::{ChangedFile, CommentPoster, DiffSource, HostError};
use crate::models::comment::PlacementDecision;
use crate::models::ChangeRef;
use crate::placement::{AnnotationScheduler, CapConfig, PlacementOutcome, SessionCounters};
use crate::providers::ReviewGenerator;
use crate::review::{extract_comments, truncate_diff};

/// Errors that abort the whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to fetch change diffs: {0}")]
    Fetch(#[from] HostError),
}

/// Outcome of one file's review.
#[derive(Debug)]
pub enum FileReport {
    /// Comments were extracted and placement was attempted.
    Reviewed {
        path: String,
        added: usize,
        removed: usize,
        outcomes: Vec<PlacementOutcome>,
    },
    /// The generator produced no actionable feedback; nothing posted.
    NoFeedback { path: String },
    /// The generation call failed or timed out; treated as no feedback.
    GenerationFailed { path: String, error: String },
    /// The patch could not be parsed; a summary note was attempted so
    /// the absence of inline comments is explained.
    ParseFailed {
        path: String,
        error: PatchError,
        noted: bool,
    },
}

impl FileReport {
    pub fn path(&self) -> &str {
        match self {
            FileReport::Reviewed { path, .. }
            | FileReport::NoFeedback { path }
            | FileReport::GenerationFailed { path, .. }
            | FileReport::ParseFailed { path, .. } => path,
        }
    }
}

/// Aggregated result of one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    fn outcomes(&self) -> impl Iterator<Item = &PlacementOutcome> {
        self.files.iter().flat_map(|f| match f {
            FileReport::Reviewed { outcomes, .. } => outcomes.as_slice(),
            _ => &[],
        })
    }

    /// Inline comments accepted by the host.
    pub fn posted(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o.decision, PlacementDecision::Resolved { .. }) && o.delivered)
            .count()
    }

    /// Issue-level fallback notes accepted by the host.
    pub fn fallbacks(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o.decision, PlacementDecision::Unresolved { .. }) && o.delivered)
            .count()
    }

    /// Comments dropped by caps or duplicate suppression.
    pub fn skipped(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o.decision, PlacementDecision::Skipped { .. }))
            .count()
    }
}

/// Drives a full review of one change.
pub struct ReviewPipeline {
    source: Arc<dyn DiffSource>,
    generator: Arc<dyn ReviewGenerator>,
    scheduler: Arc<AnnotationScheduler>,
    counters: Arc<SessionCounters>,
    generate_timeout: Duration,
    max_concurrent: usize,
}

impl ReviewPipeline {
    /// Assemble a pipeline from its collaborators and configuration.
    pub fn new(
        source: Arc<dyn DiffSource>,
        generator: Arc<dyn ReviewGenerator>,
        poster: Arc<dyn CommentPoster>,
        config: &Config,
    ) -> Self {
        let counters = Arc::new(SessionCounters::new());
        let caps = CapConfig {
            per_file: config.review.file_cap,
            global: config.review.global_cap,
        };
        let scheduler = Arc::new(AnnotationScheduler::new(
            poster,
            caps,
            Arc::clone(&counters),
            Duration::from_secs(config.review.post_timeout_secs),
        ));
        Self {
            source,
            generator,
            scheduler,
            counters,
            generate_timeout: Duration::from_secs(config.review.generate_timeout_secs),
            max_concurrent: config.review.max_concurrent.max(1),
        }
    }

    /// Total inline comments posted so far in this run.
    pub fn posted_total(&self) -> usize {
        self.counters.posted_total()
    }

    /// Review every file of the change's latest commit.
    ///
    /// Within a file, comments are attempted in extraction order; no
    /// ordering is guaranteed between files, so the final report is
    /// sorted by path for stable output.
    pub async fn run(
        &self,
        change: &ChangeRef,
        guidelines: &str,
        history: &str,
    ) -> Result<RunSummary, PipelineError> {
        self.counters.reset();
        let diffs = self.source.latest_change_diffs(change).await?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut join_set = JoinSet::new();

        for file in diffs.files {
            let generator = Arc::clone(&self.generator);
            let scheduler = Arc::clone(&self.scheduler);
            let sem = Arc::clone(&semaphore);
            let change = change.clone();
            let commit_sha = diffs.commit_sha.clone();
            let guidelines = guidelines.to_string();
            let history = history.to_string();
            let generate_timeout = self.generate_timeout;

            join_set.spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                process_file(
                    generator,
                    scheduler,
                    &change,
                    &commit_sha,
                    file,
                    &guidelines,
                    &history,
                    generate_timeout,
                )
                .await
            });
        }

        let mut files = Vec::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(report) => files.push(report),
                Err(e) => eprintln!("Warning: review task panicked: {e}"),
            }
        }
        files.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(RunSummary { files })
    }
}

/// Review one file: parse, index, generate, extract, schedule.
#[allow(clippy::too_many_arguments)]
async fn process_file(
    generator: Arc<dyn ReviewGenerator>,
    scheduler: Arc<AnnotationScheduler>,
    change: &ChangeRef,
    commit_sha: &str,
    file: ChangedFile,
    guidelines: &str,
    history: &str,
    generate_timeout: Duration,
) -> FileReport {
    let patch = match parse_file_patch(&file.path, &file.patch) {
        Ok(patch) => patch,
        Err(error) => {
            eprintln!("Warning: skipping {}: {error}", file.path);
            let note = format!(
                "Automated review could not parse the diff for `{}`; \
                 no inline comments were placed.",
                file.path
            );
            let noted = scheduler.post_issue_note(change, &note).await;
            return FileReport::ParseFailed {
                path: file.path,
                error,
                noted,
            };
        }
    };
    let index = LineIndex::build(&patch);

    let diff_text = truncate_diff(&file.patch, MAX_DIFF_CHARS);
    let generated = tokio::time::timeout(
        generate_timeout,
        generator.generate(&file.path, &diff_text, guidelines, history),
    )
    .await;
    let text = match generated {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            eprintln!("Warning: generation failed for {}: {err}", file.path);
            return FileReport::GenerationFailed {
                path: file.path,
                error: err.to_string(),
            };
        }
        Err(_) => {
            eprintln!("Warning: generation timed out for {}", file.path);
            return FileReport::GenerationFailed {
                path: file.path,
                error: "timed out".to_string(),
            };
        }
    };

    let comments = extract_comments(&text);
    if comments.is_empty() {
        // Absence of feedback is not a failure; post nothing.
        return FileReport::NoFeedback { path: file.path };
    }

    let outcomes = scheduler
        .schedule_file(change, commit_sha, &file.path, comments, &index)
        .await;
    FileReport::Reviewed {
        path: file.path,
        added: patch.added_lines(),
        removed: patch.removed_lines(),
        outcomes,
    }
}
