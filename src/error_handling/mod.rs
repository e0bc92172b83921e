//! Error handling and submission statistics.
//!
//! This module provides:
//! - Error type definitions per concern (geocoding, store, submission)
//! - Submission statistics tracking (errors, warnings, info events)
//!
//! Counter types are categorized into:
//! - **Errors**: failures that prevent a submission or query from completing
//! - **Warnings**: rejected or degraded submissions that are expected outcomes
//! - **Info**: notable events (cache hits, dataset initialization)

mod stats;
mod types;

// Re-export public API
pub use stats::SubmissionStats;
pub use types::{
    ErrorType, GeocodeError, InfoType, InitializationError, StoreError, SubmitError, WarningType,
};
