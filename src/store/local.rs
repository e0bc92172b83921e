//! Local CSV file backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error_handling::{InfoType, StoreError, SubmissionStats};
use crate::models::{Entry, EntryDataset};

use super::codec;

/// Entry store backed by a CSV file on the local filesystem.
///
/// `append` is a read-modify-rewrite of the whole file with no mutual
/// exclusion: two concurrent writers race and the later rewrite wins,
/// silently dropping the earlier append. That is an accepted limitation for
/// a low-traffic collaborative tool; callers needing correctness under
/// concurrent writers should use the remote backend, whose version tokens
/// detect the race.
pub struct LocalCsvStore {
    path: PathBuf,
    stats: Option<Arc<SubmissionStats>>,
}

impl LocalCsvStore {
    /// Creates a store over `path`. The file is created lazily on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stats: None,
        }
    }

    /// Attaches a shared statistics tracker; dataset initialization is
    /// counted against it.
    pub fn with_stats(mut self, stats: Arc<SubmissionStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full dataset.
    ///
    /// A missing file is initialized with the header row and reads as empty.
    /// A structurally broken file also reads as empty (logged in the codec),
    /// never as an error.
    pub async fn load(&self) -> Result<EntryDataset, StoreError> {
        if !self.path.exists() {
            self.initialize().await?;
            return Ok(EntryDataset::new());
        }
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(codec::decode(&bytes))
    }

    /// Appends one entry: re-loads the current dataset, adds the row, and
    /// rewrites the entire file. Returns the dataset as written.
    pub async fn append(&self, entry: Entry) -> Result<EntryDataset, StoreError> {
        let mut dataset = self.load().await?;
        dataset.push(entry);
        let bytes = codec::encode(&dataset)?;
        tokio::fs::write(&self.path, bytes).await?;
        log::debug!(
            "Rewrote {} with {} entries",
            self.path.display(),
            dataset.len()
        );
        Ok(dataset)
    }

    async fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, codec::header_only()).await?;
        if let Some(stats) = &self.stats {
            stats.increment_info(InfoType::DatasetInitialized);
        }
        log::info!("Initialized dataset file {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(username: &str) -> Entry {
        Entry {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            city: "Austin, Texas, USA".to_string(),
            country: "USA".to_string(),
            latitude: 30.27,
            longitude: -97.74,
            continent: "America".to_string(),
            un_region: "Northern America".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_initializes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.csv");
        let stats = Arc::new(SubmissionStats::new());
        let store = LocalCsvStore::new(&path).with_stats(stats.clone());

        let dataset = store.load().await.unwrap();
        assert!(dataset.is_empty());
        assert!(path.exists());
        assert_eq!(stats.get_info_count(InfoType::DatasetInitialized), 1);

        // A second load finds the file and does not count again
        store.load().await.unwrap();
        assert_eq!(stats.get_info_count(InfoType::DatasetInitialized), 1);
    }

    #[tokio::test]
    async fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCsvStore::new(dir.path().join("entries.csv"));

        store.append(entry("Bo")).await.unwrap();
        let dataset = store.load().await.unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.entries()[0].username, "Bo");
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCsvStore::new(dir.path().join("data").join("entries.csv"));
        store.append(entry("Bo")).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
