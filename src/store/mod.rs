//! Entry persistence.
//!
//! Two interchangeable backends persist the dataset as one CSV file: a local
//! file on disk and a file hosted in a GitHub repository written through the
//! contents API. Both expose the same two operations, `load` and `append`,
//! and share the codec, so a dataset written by one backend reads cleanly
//! from the other.

mod codec;
mod dedup;
mod local;
mod remote;

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error_handling::{StoreError, SubmissionStats};
use crate::models::{Entry, EntryDataset};

pub use dedup::find_recent_duplicate;
pub use local::LocalCsvStore;
pub use remote::{ContentApi, GitHubContentApi, RemoteFileState, RemoteStore};

/// A configured entry store, dispatching to one of the backends.
pub enum EntryStore {
    /// Local CSV file.
    Local(LocalCsvStore),
    /// CSV file in a GitHub repository.
    Github(RemoteStore<GitHubContentApi>),
}

impl EntryStore {
    /// Builds the store selected by `config`, counting notable store events
    /// (dataset initialization) against `stats`.
    ///
    /// The github backend needs `--github-owner` and `--github-repo`;
    /// omitting either is a configuration error, not a silent fallback.
    pub fn from_config(
        config: &Config,
        client: Arc<reqwest::Client>,
        stats: Arc<SubmissionStats>,
    ) -> Result<Self, StoreError> {
        match config.storage {
            StorageBackend::Local => Ok(Self::Local(
                LocalCsvStore::new(&config.csv_path).with_stats(stats),
            )),
            StorageBackend::Github => {
                let owner = config.github_owner.as_deref().ok_or_else(|| {
                    StoreError::Configuration(
                        "github storage requires --github-owner".to_string(),
                    )
                })?;
                let repo = config.github_repo.as_deref().ok_or_else(|| {
                    StoreError::Configuration(
                        "github storage requires --github-repo".to_string(),
                    )
                })?;
                let api = GitHubContentApi::new(
                    client,
                    owner,
                    repo,
                    &config.github_branch,
                    &config.github_path,
                )?;
                Ok(Self::Github(RemoteStore::new(api).with_stats(stats)))
            }
        }
    }

    /// Loads the full dataset, creating the backing file if absent.
    pub async fn load(&self) -> Result<EntryDataset, StoreError> {
        match self {
            Self::Local(store) => store.load().await,
            Self::Github(store) => store.load().await,
        }
    }

    /// Appends one entry and returns the dataset as written.
    pub async fn append(&self, entry: Entry) -> Result<EntryDataset, StoreError> {
        match self {
            Self::Local(store) => store.append(entry).await,
            Self::Github(store) => store.append(entry).await,
        }
    }

    /// One-line description of the configured backend, for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Local(store) => format!("local CSV at {}", store.path().display()),
            Self::Github(_) => "GitHub-hosted CSV".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_local() {
        let config = Config::default();
        let client = Arc::new(reqwest::Client::new());
        let stats = Arc::new(SubmissionStats::new());
        let store = EntryStore::from_config(&config, client, stats).unwrap();
        assert!(matches!(store, EntryStore::Local(_)));
    }

    #[test]
    fn test_from_config_github_requires_coordinates() {
        let config = Config {
            storage: StorageBackend::Github,
            ..Config::default()
        };
        let client = Arc::new(reqwest::Client::new());
        let stats = Arc::new(SubmissionStats::new());
        let result = EntryStore::from_config(&config, client, stats);
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn test_from_config_github_with_coordinates() {
        let config = Config {
            storage: StorageBackend::Github,
            github_owner: Some("example".to_string()),
            github_repo: Some("city-map-data".to_string()),
            ..Config::default()
        };
        let client = Arc::new(reqwest::Client::new());
        let stats = Arc::new(SubmissionStats::new());
        let store = EntryStore::from_config(&config, client, stats).unwrap();
        assert!(matches!(store, EntryStore::Github(_)));
    }
}
