//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `city_map` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger and HTTP client initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::sync::Arc;

use city_map::geocode::{GeocodeOutcome, Geocoder};
use city_map::initialization::{init_client, init_logger_with};
use city_map::map::MapRenderer;
use city_map::{
    submit_entry, Cli, Command, ErrorType, GeocodeError, SessionState, SubmissionStats,
    WarningType,
};
use city_map::{EntryStore, StoreError, SubmitError};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists). This allows
    // setting LOCATIONIQ_API_KEY / GITHUB_TOKEN in .env without exporting
    // them manually. Try the current directory first, then next to the
    // executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.config;

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let client = init_client(config.timeout_seconds).context("Failed to build HTTP client")?;
    let stats = Arc::new(SubmissionStats::new());

    let result = match cli.command {
        Command::Search { query } => {
            let geocoder = Geocoder::from_config(config.geocoder, client);
            run_search(&geocoder, &query, config.candidate_limit, &stats).await
        }
        Command::Submit {
            username,
            city,
            pick,
        } => {
            let geocoder = Geocoder::from_config(config.geocoder, client.clone());
            let store = EntryStore::from_config(&config, client, stats.clone())?;
            run_submit(&geocoder, &store, &config, &username, &city, pick, &stats).await
        }
        Command::List => {
            let store = EntryStore::from_config(&config, client, stats.clone())?;
            run_list(&store).await
        }
        Command::Export { output } => {
            let store = EntryStore::from_config(&config, client, stats.clone())?;
            let dataset = store.load().await?;
            let rows = city_map::export::export_csv(&dataset, output.as_ref())?;
            if let Some(path) = output {
                println!("Exported {} entries to {}", rows, path.display());
            }
            Ok(())
        }
    };

    stats.log_summary();

    if let Err(e) = result {
        eprintln!("city_map error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run_search(
    geocoder: &Geocoder,
    query: &str,
    limit: usize,
    stats: &SubmissionStats,
) -> Result<()> {
    match geocoder.resolve(query, limit).await {
        GeocodeOutcome::NotAttempted => {
            println!("No lookup attempted: type at least 2 characters (and set the provider's API key if it needs one)");
        }
        GeocodeOutcome::NoMatches => {
            stats.increment_warning(WarningType::NoMatches);
            println!("No matches for \"{}\"", query);
        }
        GeocodeOutcome::Matches(candidates) => {
            println!("{} candidate(s) for \"{}\":", candidates.len(), query);
            for (i, candidate) in candidates.iter().enumerate() {
                println!(
                    "  {}. {} ({}, {})",
                    i + 1,
                    candidate.display_name,
                    candidate.latitude,
                    candidate.longitude
                );
            }
        }
        GeocodeOutcome::Failed(error) => {
            stats.increment_error(geocode_error_type(&error));
            anyhow::bail!("geocoding failed: {}", error);
        }
    }
    Ok(())
}

async fn run_submit(
    geocoder: &Geocoder,
    store: &EntryStore,
    config: &city_map::Config,
    username: &str,
    city: &str,
    pick: Option<String>,
    stats: &SubmissionStats,
) -> Result<()> {
    let mut session = SessionState::new();
    session.set_username(username);

    match session.refresh(geocoder, city, config.candidate_limit, stats).await {
        GeocodeOutcome::Failed(error) => {
            stats.increment_error(geocode_error_type(error));
            anyhow::bail!("geocoding failed: {}", error);
        }
        GeocodeOutcome::NotAttempted => {
            anyhow::bail!("no lookup attempted for \"{}\": query too short or API key missing", city);
        }
        GeocodeOutcome::NoMatches => {
            stats.increment_warning(WarningType::NoMatches);
            anyhow::bail!("no matches for \"{}\"", city);
        }
        GeocodeOutcome::Matches(_) => {}
    }

    let confirmed = match pick {
        Some(display_name) => session.select(&display_name).cloned(),
        None => session.select_index(0).cloned(),
    };
    let Some(confirmed) = confirmed else {
        let names: Vec<&str> = session
            .candidates()
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        anyhow::bail!(
            "no candidate matched --pick; available: {}",
            names.join("; ")
        );
    };

    let Some(submission) = session.submission(config.require_username) else {
        anyhow::bail!("a username is required (--username)");
    };

    match submit_entry(store, submission, config.dedup_window_hours, stats).await {
        Ok(report) => {
            println!(
                "Added \"{}\" for {} ({} entr{} total)",
                report.entry.city,
                report.entry.username,
                report.total_entries,
                if report.total_entries == 1 { "y" } else { "ies" }
            );
            println!("Pinned at ({}, {})", confirmed.latitude, confirmed.longitude);

            let dataset = store.load().await?;
            let mut renderer = MapRenderer::new();
            let view = renderer.render(&dataset);
            println!(
                "Map: {} marker(s) in {} cluster(s), centered at ({:.2}, {:.2}) zoom {}",
                view.marker_count(),
                view.clusters.len(),
                view.center.0,
                view.center.1,
                view.zoom
            );
            Ok(())
        }
        Err(SubmitError::Duplicate {
            username,
            city,
            window_hours,
        }) => {
            println!(
                "Not added: {} already pinned \"{}\" within the last {} hours",
                username, city, window_hours
            );
            Ok(())
        }
        Err(SubmitError::Store(StoreError::Conflict)) => {
            anyhow::bail!("the shared dataset changed while submitting; please try again");
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_list(store: &EntryStore) -> Result<()> {
    let dataset = store.load().await?;
    println!(
        "{} entr{} in {}",
        dataset.len(),
        if dataset.len() == 1 { "y" } else { "ies" },
        store.describe()
    );
    for entry in dataset.entries() {
        println!(
            "  {} - {} ({}, {}) added {}",
            entry.username,
            entry.city,
            entry.latitude,
            entry.longitude,
            entry.created_at.format("%Y-%m-%d %H:%M UTC")
        );
    }

    if !dataset.is_empty() {
        println!("By continent:");
        for (continent, count) in dataset.continent_counts() {
            println!("  {}: {}", continent, count);
        }
        println!("By country:");
        for (country, count) in dataset.country_counts() {
            println!("  {}: {}", country, count);
        }
    }
    Ok(())
}

fn geocode_error_type(error: &GeocodeError) -> ErrorType {
    match error {
        GeocodeError::Network(_) => ErrorType::GeocodeNetworkError,
        GeocodeError::Status { .. } => ErrorType::GeocodeStatusError,
        GeocodeError::MalformedPayload(_) => ErrorType::GeocodeMalformedPayload,
    }
}
