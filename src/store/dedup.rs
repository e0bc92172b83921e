//! Duplicate suppression.
//!
//! A submission is a duplicate when its (username, city, country) triple
//! matches an existing entry created within a trailing time window. The
//! check runs against a freshly loaded dataset at write time; it is a local
//! consistency rule, not a uniqueness constraint enforced by the store.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Entry, EntryDataset};

/// Finds an entry that makes (`username`, `city`, `country`) a duplicate
/// within the last `window_hours`, if one exists.
///
/// Comparison is case-insensitive on trimmed values, so "paris" and
/// " Paris " collide. `now` is a parameter so the window is testable.
pub fn find_recent_duplicate<'a>(
    dataset: &'a EntryDataset,
    username: &str,
    city: &str,
    country: &str,
    window_hours: i64,
    now: DateTime<Utc>,
) -> Option<&'a Entry> {
    let cutoff = now - Duration::hours(window_hours);
    dataset.entries().iter().find(|entry| {
        entry.created_at > cutoff
            && eq_fold(&entry.username, username)
            && eq_fold(&entry.city, city)
            && eq_fold(&entry.country, country)
    })
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
