//! Error type definitions.
//!
//! One error enum per external concern (geocoding, persistence, submission),
//! plus the counter categories used by [`super::SubmissionStats`].

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for geocoding calls.
///
/// These never propagate past the gateway as panics or session failures; the
/// gateway wraps them in [`crate::geocode::GeocodeOutcome::Failed`] so callers
/// can distinguish a failed call from an empty result.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Network-level failure (connect, timeout, body read).
    #[error("geocoding request failed: {0}")]
    Network(#[from] ReqwestError),

    /// Provider answered with a non-success HTTP status.
    #[error("geocoding provider returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the provider.
        status: u16,
    },

    /// Provider payload could not be parsed as the expected JSON shape.
    #[error("geocoding payload could not be parsed: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl GeocodeError {
    /// Whether the error is transient and worth one more attempt.
    ///
    /// Timeouts, connection failures, rate limiting (429), and server errors
    /// (5xx) are transient. Client errors and malformed payloads are not: the
    /// same request would fail the same way.
    pub fn is_transient(&self) -> bool {
        match self {
            GeocodeError::Network(e) => {
                if let Some(status) = e.status() {
                    let code = status.as_u16();
                    return code == 429 || (500..600).contains(&code);
                }
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            GeocodeError::Status { status } => *status == 429 || (500..600).contains(status),
            GeocodeError::MalformedPayload(_) => false,
        }
    }
}

/// Error types for entry-store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local filesystem failure.
    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failure when rewriting the dataset.
    #[error("dataset encoding error: {0}")]
    Csv(#[from] csv::Error),

    /// Network-level failure talking to the remote content API.
    #[error("remote content request failed: {0}")]
    Network(#[from] ReqwestError),

    /// Remote content API answered with an unexpected HTTP status.
    #[error("remote store returned HTTP {status}: {detail}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Trimmed response body or status text.
        detail: String,
    },

    /// The write was rejected because the supplied version token is stale:
    /// someone else wrote the file between our read and our write. The
    /// submission is reported back to the caller, never silently retried.
    #[error("remote write rejected: the dataset changed since it was read; reload and try again")]
    Conflict,

    /// Remote file content could not be decoded (bad base64 or missing
    /// fields in the API response).
    #[error("remote content could not be decoded: {0}")]
    MalformedContent(String),

    /// The remote backend is selected but its repository coordinates are
    /// missing or invalid.
    #[error("invalid remote store configuration: {0}")]
    Configuration(String),
}

/// Error types for the submission pipeline.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The same (username, city, country) triple was submitted within the
    /// de-duplication window.
    #[error("{username} already added \"{city}\" within the last {window_hours} hours")]
    Duplicate {
        /// Contributor whose earlier entry matched.
        username: String,
        /// City of the earlier entry.
        city: String,
        /// De-duplication window in hours.
        window_hours: i64,
    },

    /// The confirmed candidate carries out-of-range or non-finite
    /// coordinates and must not be written.
    #[error("submission has out-of-range coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },

    /// The store failed to load or append. A [`StoreError::Conflict`] inside
    /// means another writer won the race and the user should retry.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure categories counted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Geocoding call failed at the network level.
    GeocodeNetworkError,
    /// Geocoding provider returned a non-success HTTP status.
    GeocodeStatusError,
    /// Geocoding payload could not be parsed.
    GeocodeMalformedPayload,
    /// Remote write rejected with a stale version token.
    StoreConflict,
    /// Local store I/O or CSV encoding failure.
    StoreIoError,
    /// Remote content API failure other than a conflict.
    StoreRemoteError,
}

/// Non-fatal conditions counted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// Submission rejected as a duplicate within the window.
    DuplicateRejected,
    /// Submission rejected for out-of-range coordinates.
    InvalidCoordinates,
    /// A provider candidate arrived without a country.
    MissingCountry,
    /// A query produced no candidates.
    NoMatches,
}

/// Informational events counted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Candidates served from session state without a network call.
    QueryServedFromSession,
    /// A remote dataset file was created fresh.
    DatasetInitialized,
    /// An entry was appended successfully.
    EntryAppended,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable label used in the end-of-run summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::GeocodeNetworkError => "Geocoding network error",
            ErrorType::GeocodeStatusError => "Geocoding HTTP status error",
            ErrorType::GeocodeMalformedPayload => "Geocoding malformed payload",
            ErrorType::StoreConflict => "Store write conflict",
            ErrorType::StoreIoError => "Store I/O error",
            ErrorType::StoreRemoteError => "Remote store error",
        }
    }
}

impl WarningType {
    /// Human-readable label used in the end-of-run summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::DuplicateRejected => "Duplicate submission rejected",
            WarningType::InvalidCoordinates => "Out-of-range coordinates",
            WarningType::MissingCountry => "Candidate missing country",
            WarningType::NoMatches => "Query produced no matches",
        }
    }
}

impl InfoType {
    /// Human-readable label used in the end-of-run summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::QueryServedFromSession => "Query served from session state",
            InfoType::DatasetInitialized => "Dataset initialized",
            InfoType::EntryAppended => "Entry appended",
        }
    }
}
