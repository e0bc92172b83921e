//! Configuration constants.
//!
//! Operational parameters used throughout the application: query gates,
//! provider etiquette, retry bounds, de-duplication, and map defaults.

use std::time::Duration;

/// Minimum trimmed query length before a geocoding call is issued.
/// Shorter queries never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Per-request timeout for geocoding and remote-store calls, in seconds.
/// Callers must never hang indefinitely on an external provider.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// TCP connection timeout in seconds.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Minimum delay between consecutive Nominatim calls.
///
/// Nominatim's usage policy asks free-tier callers to self-throttle to at
/// most one request per second. The throttle is enforced inside the
/// provider, not left to callers.
pub const NOMINATIM_MIN_DELAY: Duration = Duration::from_millis(1000);

/// Total attempts per free-text geocoding call (initial attempt + retries).
pub const GEOCODE_RETRY_ATTEMPTS: usize = 2;

/// Pause between geocoding retry attempts, in milliseconds.
pub const GEOCODE_RETRY_PAUSE_MS: u64 = 500;

/// Default number of candidates requested per query.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 5;

/// Trailing window for duplicate suppression, in hours.
/// An identical (username, city, country) triple created within this window
/// is rejected at write time.
pub const DEFAULT_DEDUP_WINDOW_HOURS: i64 = 24;

/// Sentinel username substituted for blank submissions when a username is
/// not mandatory.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// User-Agent sent with every outbound HTTP request.
/// Nominatim requires an identifying User-Agent with contact information.
pub const USER_AGENT: &str = "city_map/0.1 (community city map; contact: maintainers@citymap.dev)";

/// Environment variable holding the autocomplete provider's API key.
pub const AUTOCOMPLETE_API_KEY_VAR: &str = "LOCATIONIQ_API_KEY";

/// Environment variable holding an optional GitHub token for the remote
/// store (raises the API rate limit and allows private repositories).
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Default local dataset path.
pub const DEFAULT_CSV_PATH: &str = "data/entries.csv";

/// Fallback viewport when no valid points remain: center near the equator
/// at a world-scale zoom.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (20.0, 0.0);
/// Fallback zoom level for the world view.
pub const DEFAULT_MAP_ZOOM: u8 = 2;

/// Padding margin, in degrees, added around the fitted viewport bounds.
pub const BOUNDS_PADDING_DEG: f64 = 1.0;

/// Grid cell size, in degrees, used to cluster nearby markers at world
/// scale.
pub const CLUSTER_CELL_DEG: f64 = 5.0;

/// Canonical CSV column order for the persisted dataset. External consumers
/// depend on this exact order.
pub const CSV_HEADER: [&str; 9] = [
    "id",
    "username",
    "city",
    "country",
    "latitude",
    "longitude",
    "continent",
    "un_region",
    "created_at",
];
