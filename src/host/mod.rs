//! Hosting-service interfaces: fetching change diffs and posting
//! review comments.
//!
//! The pipeline consumes these as trait objects so that tests can
//! stand in mock implementations without network access.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChangeRef;

pub use github::GithubHost;

/// Errors from the hosting service.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("change has no commits")]
    NoCommits,

    #[error("host API error: {0}")]
    Api(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One changed file of a pull request's latest commit.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    /// Repo-relative path of the file.
    pub path: String,
    /// Unified-diff patch text (hunks only).
    pub patch: String,
}

/// The reviewable diffs of a change's latest commit.
#[derive(Debug, Clone)]
pub struct ChangeDiffs {
    /// Commit the patches belong to; inline comments anchor to it.
    pub commit_sha: String,
    /// Changed files, excluding test/generated paths and files
    /// without a textual patch.
    pub files: Vec<ChangedFile>,
}

/// Fetches the unified diffs for a change's latest revision.
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn latest_change_diffs(&self, change: &ChangeRef) -> Result<ChangeDiffs, HostError>;
}

/// Posts review comments back to the hosting service.
#[async_trait]
pub trait CommentPoster: Send + Sync {
    /// Attach an inline comment at a diff position of `path`.
    async fn post_inline(
        &self,
        change: &ChangeRef,
        commit_sha: &str,
        path: &str,
        position: u32,
        body: &str,
    ) -> Result<(), HostError>;

    /// Attach a comment to the change as a whole.
    async fn post_issue_level(&self, change: &ChangeRef, body: &str) -> Result<(), HostError>;
}
