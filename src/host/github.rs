//! GitHub REST backend for [`DiffSource`] and [`CommentPoster`].
//!
//! Endpoints used:
//! - `GET  /repos/{repo}/pulls/{number}/commits` — latest commit sha
//! - `GET  /repos/{repo}/commits/{sha}` — per-file `patch` text
//! - `POST /repos/{repo}/pulls/{number}/comments` — inline, by position
//! - `POST /repos/{repo}/issues/{number}/comments` — issue-level

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::models::ChangeRef;

use super::{ChangeDiffs, ChangedFile, CommentPoster, DiffSource, HostError};

/// GitHub REST client implementing both host-side interfaces.
#[derive(Debug, Clone)]
pub struct GithubHost {
    http: Client,
    base_api: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<CommitFile>,
}

#[derive(Debug, Deserialize)]
struct CommitFile {
    filename: String,
    /// Absent for binary files and very large diffs.
    #[serde(default)]
    patch: Option<String>,
}

impl GithubHost {
    /// Create a client for the given API root and access token.
    pub fn new(base_api: impl Into<String>, token: impl Into<String>) -> Result<Self, HostError> {
        let http = Client::builder()
            .user_agent(concat!("redline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_api = base_api.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_api,
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_api)
    }

    async fn get(&self, url: &str, context: &str) -> Result<Response, HostError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        Self::check(response, context).await
    }

    async fn check(response: Response, context: &str) -> Result<Response, HostError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(context.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        Err(HostError::Api(format!("{context}: HTTP {status}: {body}")))
    }
}

#[async_trait]
impl DiffSource for GithubHost {
    async fn latest_change_diffs(&self, change: &ChangeRef) -> Result<ChangeDiffs, HostError> {
        let commits_url = self.url(&format!(
            "/repos/{}/pulls/{}/commits?per_page=100",
            change.repo, change.number
        ));
        let commits: Vec<CommitRef> = self
            .get(&commits_url, &format!("pull request {change}"))
            .await?
            .json()
            .await?;
        let latest = commits.last().ok_or(HostError::NoCommits)?;

        let commit_url = self.url(&format!("/repos/{}/commits/{}", change.repo, latest.sha));
        let detail: CommitDetail = self
            .get(&commit_url, &format!("commit {}", latest.sha))
            .await?
            .json()
            .await?;

        let files = detail
            .files
            .into_iter()
            .filter(|f| !is_excluded_path(&f.filename))
            .filter_map(|f| {
                let patch = f.patch?;
                Some(ChangedFile {
                    path: f.filename,
                    patch,
                })
            })
            .collect();

        Ok(ChangeDiffs {
            commit_sha: latest.sha.clone(),
            files,
        })
    }
}

#[async_trait]
impl CommentPoster for GithubHost {
    async fn post_inline(
        &self,
        change: &ChangeRef,
        commit_sha: &str,
        path: &str,
        position: u32,
        body: &str,
    ) -> Result<(), HostError> {
        let url = self.url(&format!(
            "/repos/{}/pulls/{}/comments",
            change.repo, change.number
        ));
        let payload = serde_json::json!({
            "body": body,
            "commit_id": commit_sha,
            "path": path,
            "position": position,
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;
        Self::check(response, &format!("inline comment on {path}")).await?;
        Ok(())
    }

    async fn post_issue_level(&self, change: &ChangeRef, body: &str) -> Result<(), HostError> {
        let url = self.url(&format!(
            "/repos/{}/issues/{}/comments",
            change.repo, change.number
        ));
        let payload = serde_json::json!({ "body": body });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;
        Self::check(response, &format!("issue-level comment on {change}")).await?;
        Ok(())
    }
}

/// Paths excluded from review: test files and generated code.
pub fn is_excluded_path(path: &str) -> bool {
    path.ends_with("_test.go")
        || path.ends_with("_test.py")
        || path.contains("/test/")
        || path.contains("_generated")
}
