//! Configuration types and CLI options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_CANDIDATE_LIMIT, DEFAULT_CSV_PATH, DEFAULT_DEDUP_WINDOW_HOURS, HTTP_TIMEOUT_SECS,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which geocoding provider resolves free-text place queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GeocoderKind {
    /// OpenStreetMap Nominatim free-text search. No API key; the provider
    /// self-throttles and retries transient failures.
    Nominatim,
    /// LocationIQ autocomplete-by-prefix. Requires `LOCATIONIQ_API_KEY`;
    /// degrades to an empty result when the key is absent.
    Autocomplete,
}

/// Which backend persists the entry dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// A CSV file on the local filesystem. Read-modify-rewrite appends with
    /// no locking; last writer wins under concurrent use.
    Local,
    /// A CSV file hosted in a GitHub repository, written through the
    /// contents API with optimistic-concurrency SHAs.
    Github,
}

/// Library configuration.
///
/// Constructable programmatically or via CLI flags (the struct doubles as a
/// clap argument group).
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Storage backend for the entry dataset
    #[arg(long, value_enum, default_value = "local", global = true)]
    pub storage: StorageBackend,

    /// Path of the local CSV dataset (local backend)
    #[arg(long, default_value = DEFAULT_CSV_PATH, global = true)]
    pub csv_path: PathBuf,

    /// GitHub repository owner (github backend)
    #[arg(long, global = true)]
    pub github_owner: Option<String>,

    /// GitHub repository name (github backend)
    #[arg(long, global = true)]
    pub github_repo: Option<String>,

    /// Branch holding the dataset file (github backend)
    #[arg(long, default_value = "main", global = true)]
    pub github_branch: String,

    /// Path of the dataset file within the repository (github backend)
    #[arg(long, default_value = "data/entries.csv", global = true)]
    pub github_path: String,

    /// Geocoding provider
    #[arg(long, value_enum, default_value = "nominatim", global = true)]
    pub geocoder: GeocoderKind,

    /// Maximum number of candidates per query
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_LIMIT, global = true)]
    pub candidate_limit: usize,

    /// Duplicate-suppression window in hours
    #[arg(long, default_value_t = DEFAULT_DEDUP_WINDOW_HOURS, global = true)]
    pub dedup_window_hours: i64,

    /// Require a non-empty username instead of substituting "Anonymous"
    #[arg(long, global = true)]
    pub require_username: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Local,
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            github_owner: None,
            github_repo: None,
            github_branch: "main".to_string(),
            github_path: "data/entries.csv".to_string(),
            geocoder: GeocoderKind::Nominatim,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            dedup_window_hours: DEFAULT_DEDUP_WINDOW_HOURS,
            require_username: false,
            timeout_seconds: HTTP_TIMEOUT_SECS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line interface for the `city_map` binary.
#[derive(Parser, Debug)]
#[command(
    name = "city_map",
    about = "Community city map: geocode submissions, persist them to a shared CSV dataset, and summarize the rendered map"
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Shared configuration
    #[command(flatten)]
    pub config: Config,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a free-text place query and list the candidates
    Search {
        /// Place query, e.g. "Austin"
        query: String,
    },
    /// Geocode a city, confirm a candidate, and append an entry
    Submit {
        /// Contributor name (optional unless --require-username is set)
        #[arg(long, default_value = "")]
        username: String,
        /// City query to geocode
        #[arg(long)]
        city: String,
        /// Exact display name of the candidate to confirm (defaults to the
        /// first candidate)
        #[arg(long)]
        pick: Option<String>,
    },
    /// Load the dataset and print a summary of its entries
    List,
    /// Write the full dataset as CSV to a file or stdout
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
