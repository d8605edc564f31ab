//! Annotation scheduling: caps, duplicate suppression, posting, and
//! the issue-level fallback path.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::constants::{DEFAULT_FILE_CAP, DEFAULT_GLOBAL_CAP};
use crate::diff::index::LineIndex;
use crate::host::CommentPoster;
use crate::models::comment::{PlacementDecision, ReviewComment, SkipReason};
use crate::models::ChangeRef;

use super::resolver::{resolve, Resolution};

/// Posting caps. Both are caller-configurable.
#[derive(Debug, Clone, Copy)]
pub struct CapConfig {
    /// Maximum inline comments per file.
    pub per_file: usize,
    /// Maximum inline comments per run.
    pub global: usize,
}

impl Default for CapConfig {
    fn default() -> Self {
        Self {
            per_file: DEFAULT_FILE_CAP,
            global: DEFAULT_GLOBAL_CAP,
        }
    }
}

/// Run-scoped posted-comment counters.
///
/// The only mutable state shared between concurrently processed files.
/// Reservation is a single guarded check-and-increment, so the caps
/// hold even when files are scheduled in parallel; a failed post
/// releases its reservation, so the counts reflect comments actually
/// accepted by the host. The lock is never held across a network call.
#[derive(Debug, Default)]
pub struct SessionCounters {
    inner: Mutex<CounterState>,
}

#[derive(Debug, Default)]
struct CounterState {
    total: usize,
    per_file: HashMap<String, usize>,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counts to zero. Called once at the start of a run.
    pub fn reset(&self) {
        let mut state = self.inner.lock().unwrap();
        state.total = 0;
        state.per_file.clear();
    }

    /// True when either cap is already exhausted for `file`.
    fn at_cap(&self, file: &str, caps: &CapConfig) -> bool {
        let state = self.inner.lock().unwrap();
        state.total >= caps.global
            || state.per_file.get(file).copied().unwrap_or(0) >= caps.per_file
    }

    /// Atomically reserve one posting slot for `file`, if below caps.
    fn try_reserve(&self, file: &str, caps: &CapConfig) -> bool {
        let mut state = self.inner.lock().unwrap();
        let file_count = state.per_file.get(file).copied().unwrap_or(0);
        if state.total >= caps.global || file_count >= caps.per_file {
            return false;
        }
        state.total += 1;
        *state.per_file.entry(file.to_string()).or_insert(0) += 1;
        true
    }

    /// Release a reservation after a failed post.
    fn release(&self, file: &str) {
        let mut state = self.inner.lock().unwrap();
        state.total = state.total.saturating_sub(1);
        if let Some(count) = state.per_file.get_mut(file) {
            *count = count.saturating_sub(1);
        }
    }

    /// Comments posted so far across all files.
    pub fn posted_total(&self) -> usize {
        self.inner.lock().unwrap().total
    }

    /// Comments posted so far for one file.
    pub fn posted_for(&self, file: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .per_file
            .get(file)
            .copied()
            .unwrap_or(0)
    }
}

/// The verdict and delivery result for one comment.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub comment: ReviewComment,
    pub decision: PlacementDecision,
    /// Whether the host accepted the resulting comment (inline for
    /// resolved, issue-level note for unresolved).
    pub delivered: bool,
}

/// Drives comment placement, one file at a time.
///
/// Shared across concurrently processed files; all cross-file state
/// lives in [`SessionCounters`].
pub struct AnnotationScheduler {
    poster: Arc<dyn CommentPoster>,
    caps: CapConfig,
    counters: Arc<SessionCounters>,
    post_timeout: Duration,
}

impl AnnotationScheduler {
    pub fn new(
        poster: Arc<dyn CommentPoster>,
        caps: CapConfig,
        counters: Arc<SessionCounters>,
        post_timeout: Duration,
    ) -> Self {
        Self {
            poster,
            caps,
            counters,
            post_timeout,
        }
    }

    /// Place one file's comments in extraction order.
    ///
    /// Terminal per comment: posted inline, fallen back to an
    /// issue-level note, or skipped. A host rejection is logged and
    /// the loop continues; nothing here aborts the file.
    pub async fn schedule_file(
        &self,
        change: &ChangeRef,
        commit_sha: &str,
        path: &str,
        comments: Vec<ReviewComment>,
        index: &LineIndex,
    ) -> Vec<PlacementOutcome> {
        let mut outcomes = Vec::with_capacity(comments.len());
        let mut seen: HashSet<(u32, String)> = HashSet::new();

        for comment in comments {
            if self.counters.at_cap(path, &self.caps) {
                outcomes.push(PlacementOutcome {
                    comment,
                    decision: PlacementDecision::Skipped {
                        reason: SkipReason::CapReached,
                    },
                    delivered: false,
                });
                continue;
            }

            if !seen.insert((comment.line, comment.body.clone())) {
                outcomes.push(PlacementOutcome {
                    comment,
                    decision: PlacementDecision::Skipped {
                        reason: SkipReason::Duplicate,
                    },
                    delivered: false,
                });
                continue;
            }

            match resolve(&comment, path, index) {
                Resolution::Unresolved(reason) => {
                    let note = fallback_note(path, &comment);
                    let delivered = self.post_issue_note(change, &note).await;
                    outcomes.push(PlacementOutcome {
                        comment,
                        decision: PlacementDecision::Unresolved { reason },
                        delivered,
                    });
                }
                Resolution::Position(position) => {
                    if !self.counters.try_reserve(path, &self.caps) {
                        outcomes.push(PlacementOutcome {
                            comment,
                            decision: PlacementDecision::Skipped {
                                reason: SkipReason::CapReached,
                            },
                            delivered: false,
                        });
                        continue;
                    }

                    let post = self
                        .poster
                        .post_inline(change, commit_sha, path, position, &comment.body);
                    let delivered = match tokio::time::timeout(self.post_timeout, post).await {
                        Ok(Ok(())) => true,
                        Ok(Err(err)) => {
                            eprintln!(
                                "Warning: failed to post comment at {path}:{}: {err}",
                                comment.line
                            );
                            false
                        }
                        Err(_) => {
                            eprintln!(
                                "Warning: timed out posting comment at {path}:{}",
                                comment.line
                            );
                            false
                        }
                    };
                    if !delivered {
                        self.counters.release(path);
                    }
                    outcomes.push(PlacementOutcome {
                        comment,
                        decision: PlacementDecision::Resolved { position },
                        delivered,
                    });
                }
            }
        }

        outcomes
    }

    /// Post one issue-level note, best effort.
    pub async fn post_issue_note(&self, change: &ChangeRef, body: &str) -> bool {
        let post = self.poster.post_issue_level(change, body);
        match tokio::time::timeout(self.post_timeout, post).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                eprintln!("Warning: failed to post issue-level note: {err}");
                false
            }
            Err(_) => {
                eprintln!("Warning: timed out posting issue-level note");
                false
            }
        }
    }
}

/// Body of the fallback note for a comment that could not be anchored.
fn fallback_note(path: &str, comment: &ReviewComment) -> String {
    format!(
        "Could not attach this review comment to `{path}` line {}:\n\n> {}",
        comment.line, comment.body
    )
}
