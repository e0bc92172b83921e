//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, USER_AGENT};
use crate::error_handling::InitializationError;

/// Initializes the shared HTTP client.
///
/// One client serves both geocoding providers and the remote content API.
/// It is configured with:
/// - the identifying User-Agent Nominatim's usage policy requires
/// - a bounded per-request timeout (callers must never hang indefinitely)
/// - a TCP connect timeout so unreachable hosts fail fast
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(timeout_seconds: u64) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client() {
        let client = init_client(10);
        assert!(client.is_ok());
    }
}
