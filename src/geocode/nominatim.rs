//! OpenStreetMap Nominatim free-text search provider.
//!
//! Nominatim requires no API key but has a strict usage policy: callers must
//! identify themselves (User-Agent, set on the shared client) and keep to at
//! most one request per second. The throttle and a small bounded retry for
//! transient failures both live here so callers cannot get it wrong.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{GEOCODE_RETRY_ATTEMPTS, GEOCODE_RETRY_PAUSE_MS, NOMINATIM_MIN_DELAY};
use crate::error_handling::GeocodeError;

use super::{normalize, query_below_minimum, GeocodeOutcome, RawPlace};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Free-text geocoding via Nominatim.
pub struct Nominatim {
    client: Arc<reqwest::Client>,
    // Holding the lock across the pause serializes callers, which is exactly
    // the per-process rate the usage policy asks for.
    last_call: Mutex<Option<Instant>>,
}

impl Nominatim {
    /// Creates the provider over the shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            last_call: Mutex::new(None),
        }
    }

    /// Resolves a free-text query to at most `limit` candidates.
    ///
    /// Sub-minimum queries return [`GeocodeOutcome::NotAttempted`] without a
    /// network call. Transient failures are retried once after a short
    /// pause; exhaustion surfaces as [`GeocodeOutcome::Failed`], never as a
    /// propagated error.
    pub async fn resolve(&self, query: &str, limit: usize) -> GeocodeOutcome {
        if query_below_minimum(query) {
            return GeocodeOutcome::NotAttempted;
        }
        let query = query.trim();

        self.throttle().await;

        let strategy =
            FixedInterval::from_millis(GEOCODE_RETRY_PAUSE_MS).take(GEOCODE_RETRY_ATTEMPTS - 1);
        let result = RetryIf::spawn(
            strategy,
            || self.request(query, limit),
            |e: &GeocodeError| {
                let transient = e.is_transient();
                if transient {
                    log::debug!("Retrying Nominatim query \"{}\" after transient error: {}", query, e);
                }
                transient
            },
        )
        .await;

        match result {
            Ok(places) => {
                let candidates = normalize(places, limit);
                if candidates.is_empty() {
                    log::debug!("Nominatim returned no usable candidates for \"{}\"", query);
                    GeocodeOutcome::NoMatches
                } else {
                    GeocodeOutcome::Matches(candidates)
                }
            }
            Err(e) => {
                log::warn!("Nominatim query \"{}\" failed: {}", query, e);
                GeocodeOutcome::Failed(e)
            }
        }
    }

    async fn request(&self, query: &str, limit: usize) -> Result<Vec<RawPlace>, GeocodeError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let places: Vec<RawPlace> = serde_json::from_str(&body)?;
        Ok(places)
    }

    /// Sleeps until at least [`NOMINATIM_MIN_DELAY`] has passed since the
    /// previous call, then stamps the current call.
    async fn throttle(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < NOMINATIM_MIN_DELAY {
                tokio::time::sleep(NOMINATIM_MIN_DELAY - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
