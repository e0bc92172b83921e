//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - the HTTP client (bounded timeouts, identifying User-Agent)
//! - the logger (colored plain text or JSON)

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
