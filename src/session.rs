//! Per-session candidate selection state.
//!
//! One [`SessionState`] exists per UI session; it is owned by the caller,
//! never a process-wide singleton, so concurrent sessions cannot interfere.
//! It tracks exactly one query-response cycle: the last issued query, its
//! outcome, and which candidate (if any) the user confirmed.

use crate::config::ANONYMOUS_USERNAME;
use crate::error_handling::{InfoType, SubmissionStats};
use crate::geocode::{GeocodeOutcome, Geocoder};
use crate::models::LocationCandidate;

/// A submission-ready record: a username plus a confirmed candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Contributor name (already resolved against the username policy).
    pub username: String,
    /// The confirmed location candidate.
    pub candidate: LocationCandidate,
}

/// Session-scoped selection state.
#[derive(Default)]
pub struct SessionState {
    username: String,
    last_query: Option<String>,
    last_outcome: Option<GeocodeOutcome>,
    selected: Option<usize>,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records what the user typed into the name field.
    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
    }

    /// The candidates from the last query, if any.
    pub fn candidates(&self) -> &[LocationCandidate] {
        self.last_outcome
            .as_ref()
            .map(|o| o.candidates())
            .unwrap_or(&[])
    }

    /// The outcome of the last query, if one was issued.
    pub fn last_outcome(&self) -> Option<&GeocodeOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether `query` differs from the last issued query and therefore
    /// needs a fresh gateway call. Redraws with unchanged text are served
    /// from session state.
    pub fn needs_refresh(&self, query: &str) -> bool {
        self.last_query.as_deref() != Some(query.trim())
    }

    /// Stores a query's outcome, discarding the previous candidate list and
    /// any selection made against it.
    pub fn apply_outcome(&mut self, query: &str, outcome: GeocodeOutcome) {
        self.last_query = Some(query.trim().to_string());
        self.last_outcome = Some(outcome);
        self.selected = None;
    }

    /// Refreshes the candidate list for `query`, calling the gateway only
    /// when the query text changed. Returns the current outcome.
    pub async fn refresh(
        &mut self,
        geocoder: &Geocoder,
        query: &str,
        limit: usize,
        stats: &SubmissionStats,
    ) -> &GeocodeOutcome {
        if self.needs_refresh(query) {
            let outcome = geocoder.resolve(query, limit).await;
            self.apply_outcome(query, outcome);
        } else {
            stats.increment_info(InfoType::QueryServedFromSession);
            log::debug!("Serving candidates for \"{}\" from session state", query.trim());
        }
        // An outcome always exists after apply_outcome; the unreachable arm
        // covers the needs_refresh==false, never-queried case.
        self.last_outcome
            .get_or_insert(GeocodeOutcome::NotAttempted)
    }

    /// Confirms the candidate whose display name matches `display_name`
    /// exactly. Display names within one response are unique (the gateway
    /// de-duplicates them); if a tie slips through, the first match wins.
    pub fn select(&mut self, display_name: &str) -> Option<&LocationCandidate> {
        let index = self
            .candidates()
            .iter()
            .position(|c| c.display_name == display_name)?;
        self.selected = Some(index);
        self.candidates().get(index)
    }

    /// Confirms the candidate at `index` in the current list.
    pub fn select_index(&mut self, index: usize) -> Option<&LocationCandidate> {
        if index >= self.candidates().len() {
            return None;
        }
        self.selected = Some(index);
        self.candidates().get(index)
    }

    /// The confirmed candidate, if any.
    pub fn selected(&self) -> Option<&LocationCandidate> {
        self.selected.and_then(|i| self.candidates().get(i))
    }

    /// Produces a submission-ready record, or `None` when the submit action
    /// should stay disabled.
    ///
    /// Requires a confirmed candidate. With `require_username` set, a blank
    /// username also disables submission; otherwise it becomes the
    /// "Anonymous" sentinel.
    pub fn submission(&self, require_username: bool) -> Option<Submission> {
        let candidate = self.selected()?.clone();
        let trimmed = self.username.trim();
        let username = if trimmed.is_empty() {
            if require_username {
                return None;
            }
            ANONYMOUS_USERNAME.to_string()
        } else {
            trimmed.to_string()
        };
        Some(Submission {
            username,
            candidate,
        })
    }
}
