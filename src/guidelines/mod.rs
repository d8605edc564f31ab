//! Review guideline retrieval from a blob store.
//!
//! Guidelines are markdown objects under a bucket prefix. A failed or
//! empty fetch degrades to empty text — reviews proceed without
//! guidelines rather than failing the run.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the guideline store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object listing failed: {0}")]
    List(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Read-only access to guideline documents.
#[async_trait]
pub trait GuidelineStore: Send + Sync {
    /// Fetch and concatenate all markdown objects under `prefix`.
    async fn fetch_all(&self, prefix: &str) -> Result<String, StoreError>;
}

/// Google Cloud Storage JSON-API backend.
///
/// Lists objects under the prefix and downloads each `.md` object via
/// `alt=media`. Works against public buckets without credentials.
#[derive(Debug, Clone)]
pub struct GcsGuidelineStore {
    http: reqwest::Client,
    bucket: String,
}

const STORAGE_API: &str = "https://storage.googleapis.com/storage/v1";

#[derive(Debug, Deserialize)]
struct ObjectListing {
    #[serde(default)]
    items: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
}

impl GcsGuidelineStore {
    pub fn new(bucket: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("redline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            bucket: bucket.into(),
        })
    }
}

#[async_trait]
impl GuidelineStore for GcsGuidelineStore {
    async fn fetch_all(&self, prefix: &str) -> Result<String, StoreError> {
        let list_url = format!(
            "{STORAGE_API}/b/{}/o?prefix={}",
            self.bucket,
            urlencoding::encode(prefix)
        );
        let response = self.http.get(&list_url).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::List(format!(
                "HTTP {} listing {}/{prefix}",
                response.status(),
                self.bucket
            )));
        }
        let listing: ObjectListing = response.json().await?;

        let mut combined = String::new();
        for entry in listing.items.iter().filter(|e| e.name.ends_with(".md")) {
            let media_url = format!(
                "{STORAGE_API}/b/{}/o/{}?alt=media",
                self.bucket,
                urlencoding::encode(&entry.name)
            );
            let response = self.http.get(&media_url).send().await?;
            if !response.status().is_success() {
                eprintln!(
                    "Warning: skipping guideline object {}: HTTP {}",
                    entry.name,
                    response.status()
                );
                continue;
            }
            combined.push_str(&response.text().await?);
            combined.push_str("\n\n");
        }
        Ok(combined)
    }
}

/// Fetch guidelines, degrading to empty text on any failure.
pub async fn fetch_or_empty(store: &dyn GuidelineStore, prefix: &str) -> String {
    match store.fetch_all(prefix).await {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Warning: failed to fetch guidelines under {prefix}: {err}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_deserializes_and_defaults_to_empty() {
        let listing: ObjectListing = serde_json::from_str(
            r#"{"items": [{"name": "guidelines/api.md"}, {"name": "guidelines/raw.txt"}]}"#,
        )
        .unwrap();
        assert_eq!(listing.items.len(), 2);

        let empty: ObjectListing = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn only_markdown_objects_are_selected() {
        let listing = ObjectListing {
            items: vec![
                ObjectEntry {
                    name: "guidelines/api.md".to_string(),
                },
                ObjectEntry {
                    name: "guidelines/notes.txt".to_string(),
                },
                ObjectEntry {
                    name: "guidelines/style.md".to_string(),
                },
            ],
        };
        let names: Vec<&str> = listing
            .items
            .iter()
            .filter(|e| e.name.ends_with(".md"))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["guidelines/api.md", "guidelines/style.md"]);
    }

    #[tokio::test]
    async fn fetch_or_empty_degrades_on_failure() {
        struct FailingStore;

        #[async_trait]
        impl GuidelineStore for FailingStore {
            async fn fetch_all(&self, _prefix: &str) -> Result<String, StoreError> {
                Err(StoreError::List("boom".to_string()))
            }
        }

        let text = fetch_or_empty(&FailingStore, "guidelines/").await;
        assert_eq!(text, "");
    }
}
