//! city_map library: community city-map submission pipeline
//!
//! This library backs a small collaborative map: contributors type a city,
//! pick one of the geocoded candidates, and their entry is appended to a
//! shared CSV dataset (local file or GitHub-hosted) and rendered as a
//! clustered marker on a world map.
//!
//! # Example
//!
//! ```no_run
//! use city_map::{submit_entry, Config, EntryStore, Submission, SubmissionStats};
//! use city_map::models::LocationCandidate;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let client = Arc::new(reqwest::Client::new());
//! let stats = Arc::new(SubmissionStats::new());
//! let store = EntryStore::from_config(&config, client, stats.clone())?;
//!
//! let submission = Submission {
//!     username: "Bo".to_string(),
//!     candidate: LocationCandidate {
//!         display_name: "Austin, Texas, USA".to_string(),
//!         latitude: 30.27,
//!         longitude: -97.74,
//!         country: "USA".to_string(),
//!     },
//! };
//! let report = submit_entry(&store, submission, config.dedup_window_hours, &stats).await?;
//! println!("Dataset now holds {} entries", report.total_entries);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod export;
pub mod geocode;
pub mod initialization;
pub mod map;
pub mod models;
pub mod regions;
mod session;
pub mod store;

// Re-export public API
pub use config::{Cli, Command, Config, GeocoderKind, LogFormat, LogLevel, StorageBackend};
pub use error_handling::{
    ErrorType, GeocodeError, InfoType, InitializationError, StoreError, SubmissionStats,
    SubmitError, WarningType,
};
pub use pipeline::{submit_entry, SubmissionReport};
pub use session::{SessionState, Submission};
pub use store::{find_recent_duplicate, EntryStore};

// Internal pipeline module (contains the main submission logic)
mod pipeline {
    use chrono::Utc;
    use log::{info, warn};
    use uuid::Uuid;

    use crate::error_handling::{ErrorType, InfoType, SubmissionStats, WarningType};
    use crate::error_handling::{StoreError, SubmitError};
    use crate::models::{coordinates_in_range, Entry};
    use crate::regions;
    use crate::session::Submission;
    use crate::store::{find_recent_duplicate, EntryStore};

    /// Result of a successful submission.
    #[derive(Debug, Clone)]
    pub struct SubmissionReport {
        /// The entry as persisted.
        pub entry: Entry,
        /// Dataset size after the append.
        pub total_entries: usize,
    }

    /// Validates and persists one confirmed submission.
    ///
    /// The pipeline loads the current dataset, rejects duplicates inside the
    /// de-duplication window, derives the regional classification, and
    /// appends the new entry. A remote write conflict propagates as
    /// [`SubmitError::Store`] wrapping [`StoreError::Conflict`]; the caller
    /// decides whether to resubmit.
    pub async fn submit_entry(
        store: &EntryStore,
        submission: Submission,
        window_hours: i64,
        stats: &SubmissionStats,
    ) -> Result<SubmissionReport, SubmitError> {
        let candidate = &submission.candidate;
        if !coordinates_in_range(candidate.latitude, candidate.longitude) {
            stats.increment_warning(WarningType::InvalidCoordinates);
            return Err(SubmitError::InvalidCoordinates {
                latitude: candidate.latitude,
                longitude: candidate.longitude,
            });
        }
        if candidate.country.is_empty() {
            stats.increment_warning(WarningType::MissingCountry);
        }

        let dataset = store.load().await.map_err(|e| record_store_error(e, stats))?;

        if find_recent_duplicate(
            &dataset,
            &submission.username,
            &candidate.display_name,
            &candidate.country,
            window_hours,
            Utc::now(),
        )
        .is_some()
        {
            stats.increment_warning(WarningType::DuplicateRejected);
            warn!(
                "Rejected duplicate: {} already added \"{}\" within {}h",
                submission.username, candidate.display_name, window_hours
            );
            return Err(SubmitError::Duplicate {
                username: submission.username,
                city: candidate.display_name.clone(),
                window_hours,
            });
        }

        let derived = regions::derive(&candidate.country);
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            username: submission.username,
            city: candidate.display_name.clone(),
            country: candidate.country.clone(),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            continent: derived.continent,
            un_region: derived.un_region,
            created_at: Utc::now(),
        };

        let written = store
            .append(entry.clone())
            .await
            .map_err(|e| record_store_error(e, stats))?;

        stats.increment_info(InfoType::EntryAppended);
        info!(
            "Appended entry for {} at ({}, {}); dataset now holds {} entries",
            entry.username,
            entry.latitude,
            entry.longitude,
            written.len()
        );

        Ok(SubmissionReport {
            entry,
            total_entries: written.len(),
        })
    }

    fn record_store_error(error: StoreError, stats: &SubmissionStats) -> SubmitError {
        let error_type = match &error {
            StoreError::Conflict => ErrorType::StoreConflict,
            StoreError::Io(_) | StoreError::Csv(_) => ErrorType::StoreIoError,
            _ => ErrorType::StoreRemoteError,
        };
        stats.increment_error(error_type);
        SubmitError::Store(error)
    }
}
