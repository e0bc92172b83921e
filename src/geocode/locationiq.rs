//! LocationIQ autocomplete provider.
//!
//! Called on incremental keystrokes, so it answers quickly and is never
//! retried. Requires a provisioned API key; without one every call returns
//! [`GeocodeOutcome::NotAttempted`] so the UI can degrade to "no matches".

use std::sync::Arc;

use crate::config::AUTOCOMPLETE_API_KEY_VAR;
use crate::error_handling::GeocodeError;

use super::{normalize, query_below_minimum, GeocodeOutcome, RawPlace};

const AUTOCOMPLETE_URL: &str = "https://api.locationiq.com/v1/autocomplete";

/// Autocomplete-by-prefix geocoding via LocationIQ.
pub struct LocationIq {
    client: Arc<reqwest::Client>,
    api_key: Option<String>,
}

impl LocationIq {
    /// Creates the provider, reading the API key from the environment.
    ///
    /// A missing or empty key is tolerated; it is reported once here and
    /// every later call short-circuits.
    pub fn from_env(client: Arc<reqwest::Client>) -> Self {
        let api_key = std::env::var(AUTOCOMPLETE_API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            log::warn!(
                "{} is not set; autocomplete queries will return no candidates",
                AUTOCOMPLETE_API_KEY_VAR
            );
        }
        Self { client, api_key }
    }

    /// Creates the provider with an explicit key.
    pub fn with_key(client: Arc<reqwest::Client>, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    /// Resolves a prefix query to at most `limit` candidates.
    pub async fn resolve(&self, query: &str, limit: usize) -> GeocodeOutcome {
        if query_below_minimum(query) {
            return GeocodeOutcome::NotAttempted;
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return GeocodeOutcome::NotAttempted;
        };

        match self.request(query.trim(), limit, api_key).await {
            Ok(places) => {
                let candidates = normalize(places, limit);
                if candidates.is_empty() {
                    GeocodeOutcome::NoMatches
                } else {
                    GeocodeOutcome::Matches(candidates)
                }
            }
            // LocationIQ answers 404 when nothing matches the prefix
            Err(GeocodeError::Status { status: 404 }) => GeocodeOutcome::NoMatches,
            Err(e) => {
                log::warn!("Autocomplete query \"{}\" failed: {}", query.trim(), e);
                GeocodeOutcome::Failed(e)
            }
        }
    }

    async fn request(
        &self,
        query: &str,
        limit: usize,
        api_key: &str,
    ) -> Result<Vec<RawPlace>, GeocodeError> {
        let response = self
            .client
            .get(AUTOCOMPLETE_URL)
            .query(&[
                ("key", api_key),
                ("q", query),
                ("limit", &limit.to_string()),
                ("normalizeaddress", "1"),
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_client;

    #[tokio::test]
    async fn test_missing_key_is_not_attempted() {
        let provider = LocationIq::with_key(init_client(10).unwrap(), None);
        assert!(matches!(
            provider.resolve("Austin", 5).await,
            GeocodeOutcome::NotAttempted
        ));
    }

    #[tokio::test]
    async fn test_short_query_is_not_attempted_even_with_key() {
        let provider = LocationIq::with_key(init_client(10).unwrap(), Some("key".to_string()));
        assert!(matches!(
            provider.resolve("a", 5).await,
            GeocodeOutcome::NotAttempted
        ));
    }
}
