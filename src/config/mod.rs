//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (query gates, provider etiquette, map defaults)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, Config, GeocoderKind, LogFormat, LogLevel, StorageBackend};
