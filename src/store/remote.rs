//! Remote backend: the dataset as a file in a GitHub repository.
//!
//! Reads and writes go through the repository contents API: `GET` returns
//! base64 content plus an opaque SHA (the version token), `PUT` takes base64
//! content, a commit message, and the token of the revision being replaced.
//! A stale token is how the API tells us someone else wrote in between; that
//! rejection surfaces as [`StoreError::Conflict`] and is never retried
//! silently, because the duplicate check already ran against the stale data.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use url::Url;

use crate::config::GITHUB_TOKEN_VAR;
use crate::error_handling::{InfoType, StoreError, SubmissionStats};
use crate::models::{Entry, EntryDataset};

use super::codec;

/// A remote file snapshot: its bytes plus the version token they came with.
#[derive(Debug, Clone)]
pub struct RemoteFileState {
    /// Decoded file content.
    pub content: Vec<u8>,
    /// Opaque revision identifier; `None` only for files that have never
    /// been written (a write without a token is a fresh-create).
    pub version_token: Option<String>,
}

/// The seam between store logic and the hosting provider's content API.
///
/// Production uses [`GitHubContentApi`]; tests substitute an in-memory
/// implementation to exercise conflict handling without a network.
#[allow(async_fn_in_trait)]
pub trait ContentApi {
    /// Fetches the current file state, or `None` when the file is absent.
    async fn fetch(&self) -> Result<Option<RemoteFileState>, StoreError>;

    /// Writes `content` as the revision after `prior_token`, attributed with
    /// a human-readable `message`. Must fail with [`StoreError::Conflict`]
    /// when `prior_token` no longer names the current revision.
    async fn write(
        &self,
        content: &[u8],
        prior_token: Option<&str>,
        message: &str,
    ) -> Result<(), StoreError>;
}

/// Contents-API client for one file in one GitHub repository branch.
pub struct GitHubContentApi {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    branch: String,
    token: Option<String>,
}

impl GitHubContentApi {
    /// Builds the client for `owner/repo`, `branch`, and `path`.
    ///
    /// The bearer token is read from `GITHUB_TOKEN`; without one the API
    /// still works for public repositories at a much lower rate limit.
    pub fn new(
        client: Arc<reqwest::Client>,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Self, StoreError> {
        let endpoint = Url::parse(&format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            owner, repo, path
        ))
        .map_err(|e| StoreError::Configuration(format!("bad repository coordinates: {}", e)))?;

        let token = std::env::var(GITHUB_TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            log::debug!(
                "{} not set; unauthenticated GitHub API requests are limited to 60/hour",
                GITHUB_TOKEN_VAR
            );
        }

        Ok(Self {
            client,
            endpoint,
            branch: branch.to_string(),
            token,
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint.clone())
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }

    async fn error_detail(response: reqwest::Response) -> String {
        let detail = response.text().await.unwrap_or_default();
        let detail = detail.trim();
        if detail.len() > 300 {
            detail[..300].to_string()
        } else {
            detail.to_string()
        }
    }
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    sha: String,
}

impl ContentApi for GitHubContentApi {
    async fn fetch(&self) -> Result<Option<RemoteFileState>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let detail = Self::error_detail(response).await;
            if status.as_u16() == 403 && detail.contains("rate limit") {
                return Err(StoreError::Remote {
                    status: 403,
                    detail: format!(
                        "GitHub API rate limit exceeded; set {} to raise it. {}",
                        GITHUB_TOKEN_VAR, detail
                    ),
                });
            }
            return Err(StoreError::Remote {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        let parsed: ContentsResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::MalformedContent(e.to_string()))?;

        // The API wraps base64 at 60 columns; strip the line breaks first
        let encoded: String = parsed
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let content = BASE64
            .decode(encoded)
            .map_err(|e| StoreError::MalformedContent(format!("bad base64 content: {}", e)))?;

        Ok(Some(RemoteFileState {
            content,
            version_token: Some(parsed.sha),
        }))
    }

    async fn write(
        &self,
        content: &[u8],
        prior_token: Option<&str>,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut payload = serde_json::json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": self.branch,
        });
        if let Some(token) = prior_token {
            payload["sha"] = serde_json::Value::String(token.to_string());
        }

        let response = self
            .request(reqwest::Method::PUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = Self::error_detail(response).await;
        // 409 is the documented stale-SHA rejection; 422 mentioning "sha"
        // covers the missing-token-for-existing-file case
        if status.as_u16() == 409 || (status.as_u16() == 422 && detail.contains("sha")) {
            return Err(StoreError::Conflict);
        }
        Err(StoreError::Remote {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Entry store over a [`ContentApi`].
pub struct RemoteStore<A: ContentApi> {
    api: A,
    stats: Option<Arc<SubmissionStats>>,
}

impl<A: ContentApi> RemoteStore<A> {
    /// Wraps a content API client.
    pub fn new(api: A) -> Self {
        Self { api, stats: None }
    }

    /// Attaches a shared statistics tracker; dataset initialization is
    /// counted against it.
    pub fn with_stats(mut self, stats: Arc<SubmissionStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Loads the full dataset. A missing remote file is created first with
    /// an empty dataset, so later appends always have a revision to replace.
    pub async fn load(&self) -> Result<EntryDataset, StoreError> {
        match self.api.fetch().await? {
            Some(state) => Ok(codec::decode(&state.content)),
            None => {
                log::info!("Remote dataset file absent; creating it");
                self.api
                    .write(&codec::header_only(), None, "Initialize community map dataset")
                    .await?;
                if let Some(stats) = &self.stats {
                    stats.increment_info(InfoType::DatasetInitialized);
                }
                Ok(EntryDataset::new())
            }
        }
    }

    /// Appends one entry.
    ///
    /// Re-fetches content and token immediately before writing to keep the
    /// race window small, then writes back with that token. A stale-token
    /// rejection propagates as [`StoreError::Conflict`] untouched: the
    /// caller reports it to the submitter, who decides whether to retry.
    pub async fn append(&self, entry: Entry) -> Result<EntryDataset, StoreError> {
        let (mut dataset, token) = match self.api.fetch().await? {
            Some(state) => (codec::decode(&state.content), state.version_token),
            None => (EntryDataset::new(), None),
        };

        let message = commit_message(&entry);
        dataset.push(entry);
        let bytes = codec::encode(&dataset)?;
        self.api.write(&bytes, token.as_deref(), &message).await?;
        log::debug!("Wrote remote dataset with {} entries", dataset.len());
        Ok(dataset)
    }
}

/// Human-readable attribution for the storage layer's history, naming the
/// contributor and city.
fn commit_message(entry: &Entry) -> String {
    if entry.country.is_empty() {
        format!("Add entry: {} pinned {}", entry.username, entry.city)
    } else {
        format!(
            "Add entry: {} pinned {} ({})",
            entry.username, entry.city, entry.country
        )
    }
}
